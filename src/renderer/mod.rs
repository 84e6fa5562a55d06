//! Canvas rendering module
//!
//! The render pass turns game state into `DrawCommand`s. A `Canvas` executes
//! them: `DisplayList` records them for headless runs and tests, `Canvas2d`
//! paints them onto an HTML canvas.

pub mod color;
pub mod command;
pub mod display_list;
pub mod pass;

#[cfg(target_arch = "wasm32")]
pub mod canvas2d;

#[cfg(target_arch = "wasm32")]
pub use canvas2d::Canvas2d;
pub use color::{Color, palette};
pub use command::{Canvas, DrawCommand, Glow, Rect, Stroke};
pub use display_list::DisplayList;
pub use pass::render;
