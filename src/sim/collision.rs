//! Pin collision routing and wall containment
//!
//! Balls don't bounce off pins geometrically. When a ball reaches a row it is
//! snapped onto the nearest pin and sent toward one of the two pins it could
//! fall between in the next row, picked by a fair coin flip.

use glam::Vec2;
use rand::Rng;

use super::board::{Board, is_wide_row};
use super::state::Ball;
use crate::tuning::Tuning;

/// Horizontal targets a ball may head for after striking a pin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidates {
    pub left: f32,
    pub right: f32,
}

impl Candidates {
    /// Pick a side with an unbiased, memoryless draw
    pub fn choose<R: Rng>(&self, rng: &mut R) -> f32 {
        if self.left == self.right {
            return self.left;
        }
        if rng.random_bool(0.5) {
            self.left
        } else {
            self.right
        }
    }
}

/// Outcome of a pin strike
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinHit {
    pub row: usize,
    pub pin: usize,
    pub target_x: f32,
}

/// Index of the pin horizontally nearest to `x`, ties to the lower index
pub fn nearest_pin(row: &[Vec2], x: f32) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, pin) in row.iter().enumerate() {
        let dx = (x - pin.x).abs();
        match best {
            Some((_, best_dx)) if dx >= best_dx => {}
            _ => best = Some((i, dx)),
        }
    }
    best.map(|(i, _)| i)
}

/// Landing candidates below pin `pin` of row `row`
///
/// A narrow row drops onto pins {i, i+1} of the wide row below; a wide row
/// drops onto {i-1, i}. A candidate past the row edge falls back to the other
/// one. Below the last row the ball heads `last_row_offset` to either side.
pub fn landing_candidates(
    board: &Board,
    row: usize,
    pin: usize,
    x: f32,
    last_row_offset: f32,
) -> Candidates {
    let Some(next) = board.row(row + 1) else {
        return Candidates {
            left: x - last_row_offset,
            right: x + last_row_offset,
        };
    };

    let (left_idx, right_idx) = if is_wide_row(row) {
        (pin.checked_sub(1), Some(pin))
    } else {
        (Some(pin), Some(pin + 1))
    };
    let left = left_idx.and_then(|i| next.get(i)).map(|p| p.x);
    let right = right_idx.and_then(|i| next.get(i)).map(|p| p.x);

    match (left, right) {
        (Some(left), Some(right)) => Candidates { left, right },
        (Some(only), None) | (None, Some(only)) => Candidates {
            left: only,
            right: only,
        },
        (None, None) => Candidates { left: x, right: x },
    }
}

/// Resolve a strike against the ball's current row, if it has reached it
pub fn resolve_pin_hit<R: Rng>(
    ball: &mut Ball,
    board: &Board,
    tuning: &Tuning,
    rng: &mut R,
) -> Option<PinHit> {
    let row = ball.current_row;
    let pins = board.row(row)?;
    let row_y = board.row_y(row)?;
    if ball.pos.y + tuning.ball_radius < row_y {
        return None;
    }

    let pin = nearest_pin(pins, ball.pos.x)?;
    // Rest on top of the struck pin
    ball.pos.y = pins[pin].y - (tuning.ball_radius + tuning.pin_radius);

    let target_x = landing_candidates(board, row, pin, ball.pos.x, tuning.last_row_offset)
        .choose(rng);

    ball.vel.x = if ball.pos.x < target_x {
        tuning.deflect_speed
    } else {
        -tuning.deflect_speed
    };
    ball.vel.y = -ball.vel.y.abs() * tuning.bounce_damping;
    ball.current_row += 1;

    Some(PinHit {
        row,
        pin,
        target_x,
    })
}

/// Keep the ball inside the side walls; returns true on contact
///
/// The reflected speed keeps a random share of vx so balls don't pile up
/// against an edge.
pub fn contain_walls<R: Rng>(ball: &mut Ball, tuning: &Tuning, rng: &mut R) -> bool {
    let min_x = tuning.ball_radius;
    let max_x = tuning.board_width - tuning.ball_radius;
    let damping = |rng: &mut R| {
        tuning.wall_damping_min
            + rng.random::<f32>() * (tuning.wall_damping_max - tuning.wall_damping_min)
    };

    if ball.pos.x < min_x {
        ball.pos.x = min_x;
        ball.vel.x = ball.vel.x.abs() * damping(rng);
        true
    } else if ball.pos.x > max_x {
        ball.pos.x = max_x;
        ball.vel.x = -ball.vel.x.abs() * damping(rng);
        true
    } else {
        false
    }
}
