//! Game state and core simulation types

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::board::Board;
use super::flash::FlashBoard;
use crate::tuning::Tuning;
use crate::wager::Bank;

/// A falling ball
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Still falling (false once settled)
    pub active: bool,
    /// Next pin row to test
    pub current_row: usize,
    /// Settled into a bucket (set exactly once)
    pub counted: bool,
    /// Amount staked on this ball at drop time
    pub wager: f64,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, wager: f64) -> Self {
        Self {
            id,
            pos,
            vel,
            active: true,
            current_row: 0,
            counted: false,
            wager,
        }
    }
}

/// A payout slot along the floor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub multiplier: f64,
    /// Balls settled here since the last reset
    pub count: u64,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub board: Board,
    /// Active balls (in drop order)
    pub balls: Vec<Ball>,
    /// Buckets, left to right
    pub buckets: Vec<Bucket>,
    pub flashes: FlashBoard,
    pub bank: Bank,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a game on the default board
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(Tuning::default(), seed)
    }

    /// Create a game for the given (already validated) tuning
    pub fn with_tuning(tuning: Tuning, seed: u64) -> Self {
        let board = Board::new(&tuning);
        let buckets = tuning
            .multipliers
            .iter()
            .map(|&multiplier| Bucket {
                multiplier,
                count: 0,
            })
            .collect();
        let flashes = FlashBoard::new(tuning.bucket_count(), tuning.flash_window_ms);
        let bank = Bank::new(&tuning);

        Self {
            tuning,
            board,
            balls: Vec::new(),
            buckets,
            flashes,
            bank,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new ball ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn one ball at the drop point with random jitter
    pub fn spawn_ball(&mut self, wager: f64) -> u32 {
        let id = self.next_entity_id();
        let (drop_x, drop_y) = self.tuning.drop_point();
        let x = drop_x + (self.rng.random::<f32>() - 0.5) * self.tuning.drop_jitter;
        let vx = (self.rng.random::<f32>() - 0.5) * self.tuning.drop_vx_jitter;
        self.balls
            .push(Ball::new(id, Vec2::new(x, drop_y), Vec2::new(vx, 0.0), wager));
        id
    }

    /// Balls settled since the last reset
    pub fn total_settled(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// Highest bucket count (histogram scale)
    pub fn max_bucket_count(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).max().unwrap_or(0)
    }

    /// Drop every ball, counter and flash
    pub fn clear_board(&mut self) {
        self.balls.clear();
        for bucket in &mut self.buckets {
            bucket.count = 0;
        }
        self.flashes.clear();
    }
}
