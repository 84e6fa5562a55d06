//! Floor crossing, bucket assignment and payout

use glam::Vec2;

use super::flash::FlashBoard;
use super::state::{Ball, Bucket};
use crate::wager::Bank;

/// Record of one ball paying out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settlement {
    pub ball_id: u32,
    pub bucket: usize,
    pub multiplier: f64,
    pub wager: f64,
    pub payout: f64,
}

/// Bucket under horizontal position `x`, clamped to the valid range
pub fn bucket_index(x: f32, board_width: f32, bucket_count: usize) -> usize {
    if bucket_count == 0 {
        return 0;
    }
    let slot = (x / (board_width / bucket_count as f32)).floor();
    // NaN and negatives land in the first bucket
    if !(slot >= 0.0) {
        return 0;
    }
    (slot as usize).min(bucket_count - 1)
}

/// Everything a settlement mutates, borrowed apart from the ball list
pub struct Ledger<'a> {
    pub buckets: &'a mut [Bucket],
    pub flashes: &'a mut FlashBoard,
    pub bank: &'a mut Bank,
    pub board_width: f32,
}

impl Ledger<'_> {
    /// Count a ball into its bucket and pay it out
    ///
    /// Returns `None` for a ball that was already counted; such a ball is
    /// never paid twice.
    pub fn settle(&mut self, ball: &mut Ball, now_ms: f64) -> Option<Settlement> {
        if ball.counted {
            return None;
        }

        let bucket = bucket_index(ball.pos.x, self.board_width, self.buckets.len());
        let slot = self.buckets.get_mut(bucket)?;
        slot.count += 1;
        let multiplier = slot.multiplier;
        let payout = ball.wager * multiplier;

        ball.counted = true;
        ball.active = false;
        ball.vel = Vec2::ZERO;

        self.bank.credit(payout);
        self.flashes.trigger(bucket, now_ms);

        log::debug!(
            "Ball {} settled in bucket {} ({}x): paid {:.2}",
            ball.id,
            bucket,
            multiplier,
            payout
        );

        Some(Settlement {
            ball_id: ball.id,
            bucket,
            multiplier,
            wager: ball.wager,
            payout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    #[test]
    fn test_bucket_index_edges() {
        assert_eq!(bucket_index(0.0, 600.0, 11), 0);
        assert_eq!(bucket_index(300.0, 600.0, 11), 5);
        assert_eq!(bucket_index(599.9, 600.0, 11), 10);
        assert_eq!(bucket_index(600.0, 600.0, 11), 10);
        assert_eq!(bucket_index(-5.0, 600.0, 11), 0);
        assert_eq!(bucket_index(f32::NAN, 600.0, 11), 0);
        assert_eq!(bucket_index(1e9, 600.0, 11), 10);
    }

    proptest! {
        #[test]
        fn prop_bucket_index_in_range(x in 0.0f32..=600.0, count in 1usize..32) {
            let idx = bucket_index(x, 600.0, count);
            prop_assert!(idx < count);
            prop_assert_eq!(idx, bucket_index(x, 600.0, count));
        }

        #[test]
        fn prop_bucket_index_monotonic(a in 0.0f32..=600.0, b in 0.0f32..=600.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(bucket_index(lo, 600.0, 11) <= bucket_index(hi, 600.0, 11));
        }
    }

    fn ledger_parts() -> (Vec<Bucket>, FlashBoard, Bank) {
        let tuning = Tuning::default();
        let buckets = tuning
            .multipliers
            .iter()
            .map(|&multiplier| Bucket { multiplier, count: 0 })
            .collect();
        (buckets, FlashBoard::new(11, 5000.0), Bank::new(&tuning))
    }

    #[test]
    fn test_settle_pays_out_once() {
        let (mut buckets, mut flashes, mut bank) = ledger_parts();
        let mut ledger = Ledger {
            buckets: &mut buckets,
            flashes: &mut flashes,
            bank: &mut bank,
            board_width: 600.0,
        };
        let mut ball = Ball::new(1, Vec2::new(300.0, 760.0), Vec2::new(1.5, 4.0), 100.0);

        let settlement = ledger.settle(&mut ball, 0.0).unwrap();
        assert_eq!(settlement.bucket, 5);
        assert_eq!(settlement.multiplier, 10.0);
        assert_eq!(settlement.payout, 1000.0);
        assert!(ball.counted && !ball.active);
        assert_eq!(ball.vel, Vec2::ZERO);

        // Second attempt is ignored
        assert!(ledger.settle(&mut ball, 1.0).is_none());

        assert_eq!(bank.balance(), 2000.0);
        assert_eq!(buckets[5].count, 1);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<u64>(), 1);
        assert_eq!(flashes.intensity(5), 1);
    }

    #[test]
    fn test_settle_uses_ball_wager() {
        let (mut buckets, mut flashes, mut bank) = ledger_parts();
        let mut ledger = Ledger {
            buckets: &mut buckets,
            flashes: &mut flashes,
            bank: &mut bank,
            board_width: 600.0,
        };
        let mut ball = Ball::new(1, Vec2::new(10.0, 760.0), Vec2::ZERO, 20.0);
        let settlement = ledger.settle(&mut ball, 0.0).unwrap();
        assert_eq!(settlement.bucket, 0);
        assert!((settlement.payout - 1.0).abs() < 1e-9);
        assert!((bank.balance() - 1001.0).abs() < 1e-9);
    }
}
