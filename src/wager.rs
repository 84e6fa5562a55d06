//! Bank balance, bets and the animated balance readout
//!
//! The authoritative balance changes synchronously: debited in full when
//! balls are dropped, credited when each ball settles. The displayed balance
//! only chases it in fixed steps and never feeds back into settlement math.

use thiserror::Error;

use crate::sim::GameState;
use crate::tuning::Tuning;
use crate::{CURRENCY_EPSILON, floor_cents, round_cents};

/// Rejected bets
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WagerError {
    #[error("cannot bet ${required:.2} when you only have ${available:.2}")]
    InsufficientFunds { required: f64, available: f64 },
    #[error("invalid bet amount: {0}")]
    InvalidAmount(f64),
}

/// Fixed drop sizes offered to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropSize {
    Single,
    Hundred,
    Thousand,
}

impl DropSize {
    pub const ALL: [DropSize; 3] = [DropSize::Single, DropSize::Hundred, DropSize::Thousand];

    pub fn count(self) -> usize {
        match self {
            DropSize::Single => 1,
            DropSize::Hundred => 100,
            DropSize::Thousand => 1000,
        }
    }

    /// DOM id of the button that drops this many balls
    pub fn element_id(self) -> &'static str {
        match self {
            DropSize::Single => "drop-1",
            DropSize::Hundred => "drop-100",
            DropSize::Thousand => "drop-1000",
        }
    }

    /// Button caption
    pub fn label(self) -> &'static str {
        match self {
            DropSize::Single => "Drop Ball",
            DropSize::Hundred => "Drop 100 Balls",
            DropSize::Thousand => "Drop 1000 Balls",
        }
    }
}

/// One transition of the displayed balance, in discrete steps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceTween {
    start: f64,
    end: f64,
    step: u32,
    steps: u32,
}

impl BalanceTween {
    pub fn new(start: f64, end: f64, steps: u32) -> Self {
        Self {
            start,
            end,
            step: 0,
            steps: steps.max(1),
        }
    }

    /// Value shown after `step` steps; the last step lands exactly on `end`
    pub fn value_at(&self, step: u32) -> f64 {
        if step >= self.steps {
            return self.end;
        }
        let t = step as f64 / self.steps as f64;
        let value = self.start + (self.end - self.start) * t;
        // Never run past the target
        if self.end >= self.start {
            value.min(self.end)
        } else {
            value.max(self.end)
        }
    }

    /// Take one step and return the new value
    pub fn advance(&mut self) -> f64 {
        self.step = (self.step + 1).min(self.steps);
        self.value_at(self.step)
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.steps
    }
}

/// Presentation copy of the balance
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayBalance {
    value: f64,
    tween: Option<BalanceTween>,
    steps: u32,
}

impl DisplayBalance {
    pub fn new(value: f64, steps: u32) -> Self {
        Self {
            value,
            tween: None,
            steps,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Start animating from the current value toward `target`
    pub fn retarget(&mut self, target: f64) {
        self.tween = if target == self.value {
            None
        } else {
            Some(BalanceTween::new(self.value, target, self.steps))
        };
    }

    /// Advance one timer step; returns true while still animating
    pub fn step(&mut self) -> bool {
        let Some(tween) = self.tween.as_mut() else {
            return false;
        };
        self.value = tween.advance();
        if tween.is_finished() {
            self.tween = None;
        }
        self.tween.is_some()
    }

    /// Jump straight to `value`, dropping any animation
    pub fn snap(&mut self, value: f64) {
        self.value = value;
        self.tween = None;
    }
}

/// The player's money
#[derive(Debug, Clone, PartialEq)]
pub struct Bank {
    balance: f64,
    bet: f64,
    initial_stake: f64,
    display: DisplayBalance,
}

impl Bank {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            balance: tuning.initial_stake,
            bet: tuning.default_bet,
            initial_stake: tuning.initial_stake,
            display: DisplayBalance::new(tuning.initial_stake, tuning.balance_anim_steps),
        }
    }

    /// Authoritative balance
    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Pending bet per ball
    pub fn bet(&self) -> f64 {
        self.bet
    }

    /// Animated balance for the readout
    pub fn displayed(&self) -> f64 {
        self.display.value()
    }

    pub fn initial_stake(&self) -> f64 {
        self.initial_stake
    }

    pub fn is_animating(&self) -> bool {
        self.display.is_animating()
    }

    /// Advance the readout by one timer step; true while still animating
    pub fn step_display(&mut self) -> bool {
        self.display.step()
    }

    pub(crate) fn debit(&mut self, amount: f64) {
        self.balance -= amount;
        // Spending the exact balance may leave float dust below zero
        if self.balance < 0.0 && self.balance > -CURRENCY_EPSILON {
            self.balance = 0.0;
        }
        self.display.retarget(self.balance);
    }

    pub(crate) fn credit(&mut self, amount: f64) {
        self.balance += amount;
        self.display.retarget(self.balance);
    }

    /// Restore the starting stake (the pending bet is kept)
    pub fn reset(&mut self) {
        self.balance = self.initial_stake;
        self.display.snap(self.initial_stake);
    }
}

/// Color tier of the balance readout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceTier {
    High,
    Mid,
    Low,
}

impl BalanceTier {
    pub fn of(amount: f64) -> Self {
        if amount >= 1000.0 {
            BalanceTier::High
        } else if amount >= 500.0 {
            BalanceTier::Mid
        } else {
            BalanceTier::Low
        }
    }

    /// CSS class for the readout
    pub fn class(self) -> &'static str {
        match self {
            BalanceTier::High => "high",
            BalanceTier::Mid => "mid",
            BalanceTier::Low => "low",
        }
    }
}

impl GameState {
    /// Stake `amount` on each of `count` new balls
    ///
    /// The whole stake is taken up front; nothing changes if it exceeds the
    /// balance by more than float noise. Returns the IDs of the dropped balls.
    pub fn place_bet(&mut self, amount: f64, count: usize) -> Result<Vec<u32>, WagerError> {
        if !amount.is_finite() || amount < 0.0 {
            log::warn!("Rejected bet of {amount}");
            return Err(WagerError::InvalidAmount(amount));
        }

        let required = amount * count as f64;
        let available = self.bank.balance();
        if required > available + CURRENCY_EPSILON {
            log::warn!("Rejected bet of ${required:.2} with ${available:.2} in the bank");
            return Err(WagerError::InsufficientFunds {
                required,
                available,
            });
        }

        self.bank.debit(required);
        let ids: Vec<u32> = (0..count).map(|_| self.spawn_ball(amount)).collect();
        log::debug!(
            "Dropped {count} ball(s) at ${amount:.2}, balance ${:.2}",
            self.bank.balance()
        );
        Ok(ids)
    }

    /// Drop one of the fixed sizes at the pending bet
    pub fn drop_balls(&mut self, size: DropSize) -> Result<Vec<u32>, WagerError> {
        self.place_bet(self.bank.bet, size.count())
    }

    /// Set the pending bet, clamped to [0, balance] at cent precision
    pub fn set_bet(&mut self, amount: f64) {
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        self.bank.bet = round_cents(amount).min(floor_cents(self.bank.balance));
    }

    /// Bet the whole balance, down to the last whole cent
    pub fn set_all_in(&mut self) {
        self.bank.bet = floor_cents(self.bank.balance);
    }

    /// Clear the board and restore the starting stake
    pub fn reset(&mut self) {
        self.clear_board();
        self.bank.reset();
        log::info!("Game reset, bank restored to ${:.2}", self.bank.balance());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use crate::sim::Ledger;

    fn finish_animation(state: &mut GameState) -> u32 {
        let mut steps = 0;
        while state.bank.step_display() {
            steps += 1;
        }
        steps + 1
    }

    #[test]
    fn test_bet_debits_immediately() {
        let mut state = GameState::new(1);
        let ids = state.place_bet(100.0, 1).unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(state.bank.balance(), 900.0);
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.balls[0].wager, 100.0);
        // Readout has not moved yet
        assert_eq!(state.bank.displayed(), 1000.0);
        assert!(state.bank.is_animating());
    }

    #[test]
    fn test_insufficient_funds_is_atomic() {
        let tuning = Tuning {
            initial_stake: 50.0,
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(tuning, 1);
        let err = state.place_bet(1.0, 1000).unwrap_err();
        assert_eq!(
            err,
            WagerError::InsufficientFunds {
                required: 1000.0,
                available: 50.0
            }
        );
        assert_eq!(state.bank.balance(), 50.0);
        assert!(state.balls.is_empty());
        assert!(!state.bank.is_animating());
    }

    #[test]
    fn test_exact_balance_is_allowed() {
        let mut state = GameState::new(1);
        state.place_bet(10.0, 100).unwrap();
        assert_eq!(state.bank.balance(), 0.0);
        assert_eq!(
            state.place_bet(0.01, 1),
            Err(WagerError::InsufficientFunds {
                required: 0.01,
                available: 0.0
            })
        );
    }

    #[test]
    fn test_invalid_amounts() {
        let mut state = GameState::new(1);
        assert_eq!(
            state.place_bet(-1.0, 1),
            Err(WagerError::InvalidAmount(-1.0))
        );
        assert!(state.place_bet(f64::NAN, 1).is_err());
        assert!(state.place_bet(f64::INFINITY, 1).is_err());
        assert_eq!(state.bank.balance(), 1000.0);
    }

    #[test]
    fn test_drop_sizes() {
        let tuning = Tuning {
            initial_stake: 5000.0,
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(tuning, 1);
        state.set_bet(1.0);
        for size in DropSize::ALL {
            let ids = state.drop_balls(size).unwrap();
            assert_eq!(ids.len(), size.count());
        }
        assert_eq!(state.balls.len(), 1101);
        assert_eq!(state.bank.balance(), 5000.0 - 1101.0);
    }

    #[test]
    fn test_drop_size_controls() {
        let ids: Vec<&str> = DropSize::ALL.iter().map(|s| s.element_id()).collect();
        assert_eq!(ids, ["drop-1", "drop-100", "drop-1000"]);
        assert_eq!(DropSize::Single.label(), "Drop Ball");
        assert_eq!(DropSize::Thousand.label(), "Drop 1000 Balls");
    }

    #[test]
    fn test_error_message() {
        let err = WagerError::InsufficientFunds {
            required: 100.0,
            available: 50.0,
        };
        assert_eq!(err.to_string(), "cannot bet $100.00 when you only have $50.00");
    }

    #[test]
    fn test_display_converges_exactly() {
        let mut state = GameState::new(1);
        state.place_bet(33.33, 3).unwrap();
        let steps = finish_animation(&mut state);
        assert_eq!(steps, 30);
        assert_eq!(state.bank.displayed(), state.bank.balance());
        assert!(!state.bank.is_animating());
    }

    #[test]
    fn test_display_retargets_from_current_value() {
        let mut state = GameState::new(1);
        state.place_bet(100.0, 1).unwrap();
        for _ in 0..15 {
            state.bank.step_display();
        }
        let midway = state.bank.displayed();
        assert!(midway < 1000.0 && midway > 900.0);

        state.bank.credit(500.0);
        state.bank.step_display();
        assert!(state.bank.displayed() > midway);
        finish_animation(&mut state);
        assert_eq!(state.bank.displayed(), 1400.0);
    }

    #[test]
    fn test_set_bet_clamps() {
        let mut state = GameState::new(1);
        state.set_bet(12.345_6);
        assert_eq!(state.bank.bet(), 12.35);
        state.set_bet(5000.0);
        assert_eq!(state.bank.bet(), 1000.0);
        state.set_bet(-3.0);
        assert_eq!(state.bank.bet(), 0.0);
        state.set_bet(f64::NAN);
        assert_eq!(state.bank.bet(), 0.0);
    }

    #[test]
    fn test_all_in() {
        let mut state = GameState::new(1);
        state.place_bet(0.333, 3).unwrap();
        state.set_all_in();
        assert_eq!(state.bank.bet(), 999.0);
    }

    #[test]
    fn test_reset_restores_everything() {
        let mut state = GameState::new(1);
        state.set_bet(5.0);
        state.place_bet(5.0, 100).unwrap();
        for t in 0..200 {
            crate::sim::tick(&mut state, t as f64);
        }
        state.reset();

        assert_eq!(state.bank.balance(), 1000.0);
        assert_eq!(state.bank.displayed(), 1000.0);
        assert!(!state.bank.is_animating());
        assert!(state.balls.is_empty());
        assert_eq!(state.total_settled(), 0);
        assert!((0..11).all(|b| state.flashes.intensity(b) == 0));
        assert_eq!(state.bank.bet(), 5.0);
    }

    #[test]
    fn test_sub_cent_overdraft_is_rejected() {
        let tuning = Tuning {
            initial_stake: 0.0,
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(tuning, 1);
        assert!(matches!(
            state.place_bet(0.004, 1),
            Err(WagerError::InsufficientFunds { .. })
        ));
        assert_eq!(state.bank.balance(), 0.0);
        assert!(state.balls.is_empty());
    }

    #[test]
    fn test_all_in_never_exceeds_fractional_balance() {
        let tuning = Tuning {
            initial_stake: 0.996,
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(tuning, 1);
        state.set_all_in();
        assert_eq!(state.bank.bet(), 0.99);
        state.drop_balls(DropSize::Single).unwrap();
        assert!(state.bank.balance() >= 0.0);
        assert!((state.bank.balance() - 0.006).abs() < 1e-9);
    }

    #[test]
    fn test_all_in_after_fractional_payout() {
        let tuning = Tuning {
            initial_stake: 1.5,
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(tuning, 1);
        state.place_bet(1.5, 1).unwrap();
        assert_eq!(state.bank.balance(), 0.0);

        // Land the ball in the 0.25x bucket: pays 0.375
        let GameState {
            balls,
            buckets,
            flashes,
            bank,
            board,
            ..
        } = &mut state;
        let ball = &mut balls[0];
        ball.pos.x = 130.0;
        let mut ledger = Ledger {
            buckets: buckets.as_mut_slice(),
            flashes,
            bank,
            board_width: board.width,
        };
        let settled = ledger.settle(ball, 0.0).unwrap();
        assert_eq!(settled.multiplier, 0.25);
        assert_eq!(state.bank.balance(), 0.375);

        state.set_all_in();
        assert_eq!(state.bank.bet(), 0.37);
        state.drop_balls(DropSize::Single).unwrap();
        assert!(state.bank.balance() > 0.0);

        // Nothing left to cover another cent
        state.set_bet(0.01);
        assert_eq!(state.bank.bet(), 0.0);
        assert!(state.place_bet(0.01, 1).is_err());
    }

    #[test]
    fn test_float_noise_is_not_an_overdraft() {
        let tuning = Tuning {
            initial_stake: 0.3,
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(tuning, 1);
        // 0.1 * 3 is slightly above 0.3 in binary
        state.place_bet(0.1, 3).unwrap();
        assert_eq!(state.bank.balance(), 0.0);
    }

    #[test]
    fn test_zero_balls_is_a_no_op() {
        let mut state = GameState::new(1);
        assert_eq!(state.place_bet(100.0, 0), Ok(Vec::new()));
        assert_eq!(state.bank.balance(), 1000.0);
        assert!(!state.bank.is_animating());
    }

    #[test]
    fn test_balance_tiers() {
        assert_eq!(BalanceTier::of(1000.0), BalanceTier::High);
        assert_eq!(BalanceTier::of(999.99), BalanceTier::Mid);
        assert_eq!(BalanceTier::of(500.0), BalanceTier::Mid);
        assert_eq!(BalanceTier::of(0.0).class(), "low");
    }

    proptest! {
        #[test]
        fn prop_overdraw_leaves_state_untouched(amount in 0.01f64..500.0, count in 1usize..2000) {
            let mut state = GameState::new(3);
            let before = state.bank.clone();
            let result = state.place_bet(amount, count);
            if amount * count as f64 > 1000.0 {
                prop_assert!(result.is_err());
                prop_assert_eq!(&state.bank, &before);
                prop_assert!(state.balls.is_empty());
            } else {
                prop_assert_eq!(result.unwrap().len(), count);
                prop_assert_eq!(state.bank.balance(), 1000.0 - amount * count as f64);
            }
        }

        #[test]
        fn prop_tween_never_overshoots(start in -1e6f64..1e6, end in -1e6f64..1e6, steps in 1u32..120) {
            let mut tween = BalanceTween::new(start, end, steps);
            let mut prev = start;
            while !tween.is_finished() {
                let value = tween.advance();
                if end >= start {
                    prop_assert!(value <= end && value >= prev);
                } else {
                    prop_assert!(value >= end && value <= prev);
                }
                prev = value;
            }
            prop_assert_eq!(prev, end);
        }
    }
}
