//! Per-frame render pass
//!
//! Reads the game state and issues draw commands. Never mutates the game.

use glam::Vec2;

use super::color::{Color, flash_color, palette};
use super::command::{Canvas, DrawCommand, Glow, Rect, Stroke};
use crate::consts::FLASH_INTENSITY_CAP;
use crate::settings::Settings;
use crate::sim::GameState;

/// Gap between the buckets and the histogram band
const HISTOGRAM_GAP: f32 = 20.0;
const HISTOGRAM_HEIGHT: f32 = 90.0;
const PERCENT_LABEL_OFFSET: f32 = 15.0;

const LABEL_SIZE: f32 = 16.0;
const PERCENT_SIZE: f32 = 12.0;
const MULTIPLIER_LABEL_Y: f32 = 4.0;
const COUNT_LABEL_Y: f32 = 30.0;

const PIN_GLOW_BLUR: f32 = 10.0;
const BALL_GLOW_BLUR: f32 = 15.0;

/// Draw one complete frame
pub fn render(state: &GameState, settings: &Settings, canvas: &mut dyn Canvas) {
    canvas.draw(DrawCommand::Clear {
        width: state.board.width,
        height: state.board.height,
        color: palette::BACKGROUND,
    });

    draw_pins(state, settings, canvas);
    draw_buckets(state, settings, canvas);
    if settings.show_histogram {
        draw_histogram(state, canvas);
    }
    if settings.show_percentages {
        draw_percentages(state, canvas);
    }
    draw_balls(state, settings, canvas);
}

fn glow(settings: &Settings, color: Color, blur: f32) -> Option<Glow> {
    let scale = settings.glow_scale();
    (scale > 0.0).then(|| Glow {
        color,
        blur: blur * scale,
    })
}

fn draw_pins(state: &GameState, settings: &Settings, canvas: &mut dyn Canvas) {
    let stroke = Some(Stroke {
        color: palette::PIN_RIM,
        width: 2.0,
    });
    let glow = glow(settings, palette::PIN_RIM, PIN_GLOW_BLUR);
    for pin in state.board.pins() {
        canvas.draw(DrawCommand::Circle {
            center: pin,
            radius: state.tuning.pin_radius,
            fill: palette::PIN,
            stroke,
            glow,
        });
    }
}

fn draw_buckets(state: &GameState, settings: &Settings, canvas: &mut dyn Canvas) {
    let width = state.tuning.bucket_width();
    let top = state.tuning.bucket_top();
    let height = state.tuning.bucket_height;

    for (i, bucket) in state.buckets.iter().enumerate() {
        let rect = Rect::new(i as f32 * width, top, width, height);
        let intensity = if settings.effective_bucket_flash() {
            state.flashes.intensity(i)
        } else {
            0
        };

        canvas.draw(DrawCommand::FillRect {
            rect,
            color: flash_color(intensity, FLASH_INTENSITY_CAP),
        });
        canvas.draw(DrawCommand::StrokeRect {
            rect,
            stroke: Stroke {
                color: palette::BUCKET_OUTLINE,
                width: 2.0,
            },
        });

        let center_x = rect.x + width / 2.0;
        canvas.draw(DrawCommand::Text {
            text: multiplier_label(bucket.multiplier),
            pos: Vec2::new(center_x, top + MULTIPLIER_LABEL_Y),
            size: LABEL_SIZE,
            color: palette::LABEL,
        });
        canvas.draw(DrawCommand::Text {
            text: bucket.count.to_string(),
            pos: Vec2::new(center_x, top + COUNT_LABEL_Y),
            size: LABEL_SIZE,
            color: palette::LABEL,
        });
    }
}

/// Top edge of the histogram band
fn histogram_top(state: &GameState) -> f32 {
    state.tuning.bucket_top() + state.tuning.bucket_height + HISTOGRAM_GAP
}

/// Polyline vertices: one per bucket, scaled so the fullest bucket touches
/// the top of the band
pub fn histogram_points(state: &GameState) -> Vec<Vec2> {
    let width = state.tuning.bucket_width();
    let top = histogram_top(state);
    let max = state.max_bucket_count();

    state
        .buckets
        .iter()
        .enumerate()
        .map(|(i, bucket)| {
            let x = i as f32 * width + width / 2.0;
            let h = if max > 0 {
                bucket.count as f32 / max as f32 * HISTOGRAM_HEIGHT
            } else {
                0.0
            };
            Vec2::new(x, top + HISTOGRAM_HEIGHT - h)
        })
        .collect()
}

fn draw_histogram(state: &GameState, canvas: &mut dyn Canvas) {
    canvas.draw(DrawCommand::Polyline {
        points: histogram_points(state),
        stroke: Stroke {
            color: palette::HISTOGRAM,
            width: 3.0,
        },
    });
    canvas.draw(DrawCommand::StrokeRect {
        rect: Rect::new(0.0, histogram_top(state), state.board.width, HISTOGRAM_HEIGHT),
        stroke: Stroke {
            color: palette::HISTOGRAM_FRAME,
            width: 1.0,
        },
    });
}

fn draw_percentages(state: &GameState, canvas: &mut dyn Canvas) {
    let width = state.tuning.bucket_width();
    let y = histogram_top(state) + HISTOGRAM_HEIGHT + PERCENT_LABEL_OFFSET;
    let total = state.total_settled();

    for (i, bucket) in state.buckets.iter().enumerate() {
        canvas.draw(DrawCommand::Text {
            text: percent_label(bucket.count, total),
            pos: Vec2::new(i as f32 * width + width / 2.0, y),
            size: PERCENT_SIZE,
            color: palette::PERCENT_LABEL,
        });
    }
}

fn draw_balls(state: &GameState, settings: &Settings, canvas: &mut dyn Canvas) {
    let glow = glow(settings, palette::BALL_GLOW, BALL_GLOW_BLUR);
    for ball in state.balls.iter().filter(|b| b.active) {
        canvas.draw(DrawCommand::Circle {
            center: ball.pos,
            radius: state.tuning.ball_radius,
            fill: palette::BALL,
            stroke: None,
            glow,
        });
    }
}

/// "10x", "0.05x"
pub fn multiplier_label(multiplier: f64) -> String {
    format!("{multiplier}x")
}

/// Share of all settled balls, one decimal; "0.0%" before anything lands
pub fn percent_label(count: u64, total: u64) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", count as f64 / total as f64 * 100.0)
}
