//! Data-driven board and physics tuning
//!
//! Defaults mirror `consts`; a host may override any subset from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected tuning values
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("board dimensions must be positive, got {width}x{height}")]
    BoardSize { width: f32, height: f32 },
    #[error("board needs at least one row of pins")]
    NoRows,
    #[error("rows need at least one pin")]
    NoPins,
    #[error("pin field ratio must lie in (0, 1], got {0}")]
    PinFieldRatio(f32),
    #[error("at least one bucket multiplier is required")]
    NoBuckets,
    #[error("multiplier {value} for bucket {index} must be finite and non-negative")]
    Multiplier { index: usize, value: f64 },
    #[error("{name} must lie in [0, 1), got {value}")]
    Damping { name: &'static str, value: f32 },
    #[error("gravity must be positive and finite, got {0}")]
    Gravity(f32),
    #[error("{name} must be positive, got {value}")]
    Radius { name: &'static str, value: f32 },
    #[error("ball diameter {diameter} does not fit a board {width} wide")]
    BallTooWide { diameter: f32, width: f32 },
    #[error("bucket top ratio must lie in (0, 1], got {0}")]
    BucketTopRatio(f32),
    #[error("balance animation duration must be finite and non-negative, got {0}")]
    AnimationDuration(f64),
    #[error("balance animation needs at least one step")]
    NoAnimationSteps,
    #[error("initial stake must be finite and non-negative, got {0}")]
    Stake(f64),
}

/// Board geometry, physics and economy constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub board_width: f32,
    pub board_height: f32,
    pub rows: usize,
    pub pins_per_row: usize,
    pub pin_field_ratio: f32,
    pub ball_radius: f32,
    pub pin_radius: f32,
    pub gravity: f32,
    pub deflect_speed: f32,
    pub bounce_damping: f32,
    pub last_row_offset: f32,
    pub wall_damping_min: f32,
    pub wall_damping_max: f32,
    pub drop_jitter: f32,
    pub drop_vx_jitter: f32,
    pub bucket_top_ratio: f32,
    pub bucket_height: f32,
    pub multipliers: Vec<f64>,
    pub flash_window_ms: f64,
    pub balance_anim_ms: f64,
    pub balance_anim_steps: u32,
    pub initial_stake: f64,
    pub default_bet: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            rows: ROWS,
            pins_per_row: PINS_PER_ROW,
            pin_field_ratio: PIN_FIELD_RATIO,
            ball_radius: BALL_RADIUS,
            pin_radius: PIN_RADIUS,
            gravity: GRAVITY,
            deflect_speed: DEFLECT_SPEED,
            bounce_damping: BOUNCE_DAMPING,
            last_row_offset: LAST_ROW_OFFSET,
            wall_damping_min: WALL_DAMPING_MIN,
            wall_damping_max: WALL_DAMPING_MAX,
            drop_jitter: DROP_JITTER,
            drop_vx_jitter: DROP_VX_JITTER,
            bucket_top_ratio: BUCKET_TOP_RATIO,
            bucket_height: BUCKET_HEIGHT,
            multipliers: MULTIPLIERS.to_vec(),
            flash_window_ms: FLASH_WINDOW_MS,
            balance_anim_ms: BALANCE_ANIM_MS,
            balance_anim_steps: BALANCE_ANIM_STEPS,
            initial_stake: INITIAL_STAKE,
            default_bet: DEFAULT_BET,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!(
            "Loaded tuning: {} rows, {} buckets",
            tuning.rows,
            tuning.bucket_count()
        );
        Ok(tuning)
    }

    /// Check that the values describe a playable board
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.board_width > 0.0 && self.board_height > 0.0) {
            return Err(TuningError::BoardSize {
                width: self.board_width,
                height: self.board_height,
            });
        }
        if self.rows == 0 {
            return Err(TuningError::NoRows);
        }
        if self.pins_per_row == 0 {
            return Err(TuningError::NoPins);
        }
        if !(self.pin_field_ratio > 0.0 && self.pin_field_ratio <= 1.0) {
            return Err(TuningError::PinFieldRatio(self.pin_field_ratio));
        }
        if !(self.gravity > 0.0 && self.gravity.is_finite()) {
            return Err(TuningError::Gravity(self.gravity));
        }
        for (name, value) in [
            ("ball_radius", self.ball_radius),
            ("pin_radius", self.pin_radius),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(TuningError::Radius { name, value });
            }
        }
        if self.ball_radius * 2.0 >= self.board_width {
            return Err(TuningError::BallTooWide {
                diameter: self.ball_radius * 2.0,
                width: self.board_width,
            });
        }
        if !(self.bucket_top_ratio > 0.0 && self.bucket_top_ratio <= 1.0) {
            return Err(TuningError::BucketTopRatio(self.bucket_top_ratio));
        }
        if self.multipliers.is_empty() {
            return Err(TuningError::NoBuckets);
        }
        if let Some((index, &value)) = self
            .multipliers
            .iter()
            .enumerate()
            .find(|(_, m)| !m.is_finite() || **m < 0.0)
        {
            return Err(TuningError::Multiplier { index, value });
        }
        for (name, value) in [
            ("bounce_damping", self.bounce_damping),
            ("wall_damping_min", self.wall_damping_min),
            ("wall_damping_max", self.wall_damping_max),
        ] {
            if !(0.0..1.0).contains(&value) {
                return Err(TuningError::Damping { name, value });
            }
        }
        if self.wall_damping_min > self.wall_damping_max {
            return Err(TuningError::Damping {
                name: "wall_damping_min",
                value: self.wall_damping_min,
            });
        }
        if !(self.balance_anim_ms >= 0.0 && self.balance_anim_ms.is_finite()) {
            return Err(TuningError::AnimationDuration(self.balance_anim_ms));
        }
        if self.balance_anim_steps == 0 {
            return Err(TuningError::NoAnimationSteps);
        }
        if !self.initial_stake.is_finite() || self.initial_stake < 0.0 {
            return Err(TuningError::Stake(self.initial_stake));
        }
        Ok(())
    }

    pub fn bucket_count(&self) -> usize {
        self.multipliers.len()
    }

    pub fn bucket_width(&self) -> f32 {
        self.board_width / self.bucket_count() as f32
    }

    /// Top edge of the bucket boxes
    pub fn bucket_top(&self) -> f32 {
        self.board_height * self.bucket_top_ratio
    }

    /// A ball below this line has crossed the floor
    pub fn floor_y(&self) -> f32 {
        self.bucket_top() + self.bucket_height - self.ball_radius
    }

    /// Drop point (top-center, one ball diameter down)
    pub fn drop_point(&self) -> (f32, f32) {
        (self.board_width / 2.0, self.ball_radius * 2.0)
    }

    /// Period of the displayed balance timer
    pub fn balance_step_ms(&self) -> f64 {
        self.balance_anim_ms / self.balance_anim_steps as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.bucket_count(), 11);
        assert_eq!(tuning.floor_y(), 900.0 * 0.75 + 80.0 - 8.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "rows": 8, "initial_stake": 250.0 }"#).unwrap();
        assert_eq!(tuning.rows, 8);
        assert_eq!(tuning.initial_stake, 250.0);
        assert_eq!(tuning.pins_per_row, PINS_PER_ROW);
        assert_eq!(tuning.multipliers, MULTIPLIERS.to_vec());
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            Tuning::from_json("{ rows: "),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_values() {
        let mut tuning = Tuning::default();
        tuning.multipliers.clear();
        assert!(matches!(tuning.validate(), Err(TuningError::NoBuckets)));

        let mut tuning = Tuning::default();
        tuning.multipliers[3] = -1.0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Multiplier { index: 3, .. })
        ));

        let mut tuning = Tuning::default();
        tuning.bounce_damping = 1.0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Damping { name: "bounce_damping", .. })
        ));

        let mut tuning = Tuning::default();
        tuning.rows = 0;
        assert!(matches!(tuning.validate(), Err(TuningError::NoRows)));

        let mut tuning = Tuning::default();
        tuning.board_width = 0.0;
        assert!(matches!(tuning.validate(), Err(TuningError::BoardSize { .. })));
    }

    #[test]
    fn test_rejects_unsettleable_physics() {
        let mut tuning = Tuning::default();
        tuning.gravity = 0.0;
        assert!(matches!(tuning.validate(), Err(TuningError::Gravity(_))));
        tuning.gravity = -0.2;
        assert!(matches!(tuning.validate(), Err(TuningError::Gravity(_))));

        let mut tuning = Tuning::default();
        tuning.ball_radius = 0.0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Radius { name: "ball_radius", .. })
        ));

        let mut tuning = Tuning::default();
        tuning.pin_radius = -5.0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Radius { name: "pin_radius", .. })
        ));

        let mut tuning = Tuning::default();
        tuning.ball_radius = 300.0;
        assert!(matches!(tuning.validate(), Err(TuningError::BallTooWide { .. })));

        let mut tuning = Tuning::default();
        tuning.bucket_top_ratio = 1.5;
        assert!(matches!(tuning.validate(), Err(TuningError::BucketTopRatio(_))));
        tuning.bucket_top_ratio = 0.0;
        assert!(matches!(tuning.validate(), Err(TuningError::BucketTopRatio(_))));

        let mut tuning = Tuning::default();
        tuning.balance_anim_ms = -1.0;
        assert!(matches!(tuning.validate(), Err(TuningError::AnimationDuration(_))));
    }

    #[test]
    fn test_balance_step_period() {
        let tuning = Tuning::default();
        assert!((tuning.balance_step_ms() - 500.0 / 30.0).abs() < 1e-9);
    }
}
