//! Drawing primitives and the canvas abstraction

use glam::Vec2;

use super::color::Color;

/// Axis-aligned rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// Outline style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

/// Soft shadow around a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub color: Color,
    pub blur: f32,
}

/// A single drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole surface
    Clear { width: f32, height: f32, color: Color },
    Circle {
        center: Vec2,
        radius: f32,
        fill: Color,
        stroke: Option<Stroke>,
        glow: Option<Glow>,
    },
    FillRect { rect: Rect, color: Color },
    StrokeRect { rect: Rect, stroke: Stroke },
    Polyline { points: Vec<Vec2>, stroke: Stroke },
    /// Text horizontally centered on `pos.x`, top edge at `pos.y`
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: Color,
    },
}

/// A 2D drawing target
pub trait Canvas {
    fn draw(&mut self, command: DrawCommand);
}
