//! Plinko - a canvas-rendered betting game
//!
//! Core modules:
//! - `sim`: Stepped simulation (board, ball physics, settlement, flashes)
//! - `wager`: Bank balance, bets and the animated balance readout
//! - `renderer`: Render pass over a canvas-like drawing target
//! - `game_loop`: Frame-driven loop with cancellable scheduling
//! - `tuning`: Data-driven board and physics constants
//! - `settings`: Presentation preferences
//! - `embed`: Components a host page can mount

pub mod embed;
pub mod game_loop;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod wager;

pub use embed::Embed;
pub use game_loop::{GameLoop, ManualScheduler, Scheduler, TaskId};
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};
pub use wager::{BalanceTier, DropSize, WagerError};

/// Game configuration constants
pub mod consts {
    /// Canvas dimensions (pixels)
    pub const BOARD_WIDTH: f32 = 600.0;
    pub const BOARD_HEIGHT: f32 = 900.0;

    /// Pin lattice: even rows carry PINS_PER_ROW pins, odd rows one more
    pub const ROWS: usize = 12;
    pub const PINS_PER_ROW: usize = 11;
    /// Fraction of the board height the pin field spans
    pub const PIN_FIELD_RATIO: f32 = 0.7;

    pub const BALL_RADIUS: f32 = 8.0;
    pub const PIN_RADIUS: f32 = 5.0;

    /// Downward acceleration (pixels per tick²)
    pub const GRAVITY: f32 = 0.2;
    /// Horizontal speed after deflecting off a pin (pixels per tick)
    pub const DEFLECT_SPEED: f32 = 1.5;
    /// Vertical velocity retained on a pin bounce
    pub const BOUNCE_DAMPING: f32 = 0.5;
    /// Lateral target offset when bouncing off the last row
    pub const LAST_ROW_OFFSET: f32 = 30.0;
    /// Wall reflection keeps a random share of vx in [MIN, MAX)
    pub const WALL_DAMPING_MIN: f32 = 0.7;
    pub const WALL_DAMPING_MAX: f32 = 0.9;

    /// Horizontal spread of the drop point around top-center
    pub const DROP_JITTER: f32 = 40.0;
    /// Spread of the initial horizontal velocity
    pub const DROP_VX_JITTER: f32 = 0.5;

    /// Buckets start at this fraction of the board height
    pub const BUCKET_TOP_RATIO: f32 = 0.75;
    pub const BUCKET_HEIGHT: f32 = 80.0;

    /// Payout multipliers, left to right
    pub const MULTIPLIERS: [f64; 11] = [0.05, 0.1, 0.25, 0.6, 1.2, 10.0, 1.2, 0.6, 0.25, 0.1, 0.05];

    /// Bucket flash resets after this long without a new settlement
    pub const FLASH_WINDOW_MS: f64 = 5000.0;
    /// Intensity beyond this no longer brightens the bucket
    pub const FLASH_INTENSITY_CAP: u32 = 50;

    /// Displayed balance animation
    pub const BALANCE_ANIM_MS: f64 = 500.0;
    pub const BALANCE_ANIM_STEPS: u32 = 30;

    /// Starting bank and default bet
    pub const INITIAL_STAKE: f64 = 1000.0;
    pub const DEFAULT_BET: f64 = 100.0;
}

/// Round a currency amount to cents
#[inline]
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Largest whole-cent amount not above `amount` (float noise tolerated)
#[inline]
pub fn floor_cents(amount: f64) -> f64 {
    let rounded = round_cents(amount);
    if rounded > amount + CURRENCY_EPSILON {
        round_cents(rounded - 0.01)
    } else {
        rounded
    }
}

/// Tolerance for float noise in currency comparisons, far below a cent
pub const CURRENCY_EPSILON: f64 = 1e-9;
