//! Stepped simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - One tick per frame, fixed per-tick constants
//! - All randomness drawn from the state's seedable RNG
//! - Stable iteration order (drop order)

pub mod board;
pub mod collision;
pub mod flash;
pub mod settlement;
pub mod state;
pub mod tick;

pub use board::Board;
pub use collision::{Candidates, PinHit, contain_walls, landing_candidates, nearest_pin, resolve_pin_hit};
pub use flash::{Flash, FlashBoard};
pub use settlement::{Ledger, Settlement, bucket_index};
pub use state::{Ball, Bucket, GameState};
pub use tick::{step_ball, tick};
