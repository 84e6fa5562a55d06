//! HTML canvas backend

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::command::{Canvas, DrawCommand, Glow};

/// Paints draw commands onto a 2D canvas context
pub struct Canvas2d {
    ctx: CanvasRenderingContext2d,
}

impl Canvas2d {
    /// Acquire the 2D context of `canvas`
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, String> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| format!("getContext failed: {e:?}"))?
            .ok_or("2d context unavailable")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "context is not a CanvasRenderingContext2d")?;
        Ok(Self { ctx })
    }

    fn set_glow(&self, glow: Option<Glow>) {
        match glow {
            Some(glow) => {
                self.ctx.set_shadow_color(&glow.color.to_css());
                self.ctx.set_shadow_blur(glow.blur as f64);
            }
            None => self.ctx.set_shadow_blur(0.0),
        }
    }
}

impl Canvas for Canvas2d {
    fn draw(&mut self, command: DrawCommand) {
        let ctx = &self.ctx;
        match command {
            DrawCommand::Clear {
                width,
                height,
                color,
            } => {
                self.set_glow(None);
                ctx.set_fill_style_str(&color.to_css());
                ctx.fill_rect(0.0, 0.0, width as f64, height as f64);
            }
            DrawCommand::Circle {
                center,
                radius,
                fill,
                stroke,
                glow,
            } => {
                self.set_glow(glow);
                ctx.begin_path();
                ctx.arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
                    .ok();
                ctx.set_fill_style_str(&fill.to_css());
                ctx.fill();
                if let Some(stroke) = stroke {
                    ctx.set_stroke_style_str(&stroke.color.to_css());
                    ctx.set_line_width(stroke.width as f64);
                    ctx.stroke();
                }
                self.set_glow(None);
            }
            DrawCommand::FillRect { rect, color } => {
                ctx.set_fill_style_str(&color.to_css());
                ctx.fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
            }
            DrawCommand::StrokeRect { rect, stroke } => {
                ctx.set_stroke_style_str(&stroke.color.to_css());
                ctx.set_line_width(stroke.width as f64);
                ctx.stroke_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
            }
            DrawCommand::Polyline { points, stroke } => {
                let Some((first, rest)) = points.split_first() else {
                    return;
                };
                ctx.begin_path();
                ctx.move_to(first.x as f64, first.y as f64);
                for p in rest {
                    ctx.line_to(p.x as f64, p.y as f64);
                }
                ctx.set_stroke_style_str(&stroke.color.to_css());
                ctx.set_line_width(stroke.width as f64);
                ctx.stroke();
            }
            DrawCommand::Text {
                text,
                pos,
                size,
                color,
            } => {
                ctx.set_font(&format!("{size}px sans-serif"));
                ctx.set_text_align("center");
                ctx.set_text_baseline("top");
                ctx.set_fill_style_str(&color.to_css());
                ctx.fill_text(&text, pos.x as f64, pos.y as f64).ok();
            }
        }
    }
}
