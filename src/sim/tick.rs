//! Per-frame simulation tick
//!
//! Advances every active ball by one step, settles floor crossings and
//! retires settled balls.

use rand::Rng;

use super::board::Board;
use super::collision::{contain_walls, resolve_pin_hit};
use super::settlement::{Ledger, Settlement};
use super::state::{Ball, GameState};
use crate::tuning::Tuning;

/// Integrate one ball by one tick (gravity, motion, pins, walls)
pub fn step_ball<R: Rng>(ball: &mut Ball, board: &Board, tuning: &Tuning, rng: &mut R) {
    ball.vel.y += tuning.gravity;
    ball.pos += ball.vel;

    resolve_pin_hit(ball, board, tuning, rng);
    contain_walls(ball, tuning, rng);
}

/// Advance the game by one tick at host time `now_ms`
///
/// Returns the settlements that happened during this tick.
pub fn tick(state: &mut GameState, now_ms: f64) -> Vec<Settlement> {
    state.time_ticks += 1;
    state.flashes.expire(now_ms);

    let GameState {
        tuning,
        board,
        balls,
        buckets,
        flashes,
        bank,
        rng,
        ..
    } = state;

    let floor_y = tuning.floor_y();
    let mut ledger = Ledger {
        buckets: buckets.as_mut_slice(),
        flashes,
        bank,
        board_width: board.width,
    };

    let mut settlements = Vec::new();
    for ball in balls.iter_mut().filter(|b| b.active) {
        step_ball(ball, board, tuning, rng);
        if ball.pos.y > floor_y {
            settlements.extend(ledger.settle(ball, now_ms));
        }
    }

    balls.retain(|b| b.active);
    settlements
}
