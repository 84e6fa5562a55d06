//! Bucket flash intensity with delayed reset
//!
//! Each settlement bumps its bucket's intensity and restarts that bucket's
//! window; once a window lapses with no new settlement the intensity drops
//! back to zero.

/// Flash state of a single bucket
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Flash {
    pub intensity: u32,
    /// Host time (ms) at which the flash resets
    pub expires_at: Option<f64>,
}

/// Flash state for every bucket, indexed by bucket
#[derive(Debug, Clone, PartialEq)]
pub struct FlashBoard {
    flashes: Vec<Flash>,
    window_ms: f64,
}

impl FlashBoard {
    pub fn new(buckets: usize, window_ms: f64) -> Self {
        Self {
            flashes: vec![Flash::default(); buckets],
            window_ms,
        }
    }

    /// Register a settlement in `bucket` at host time `now_ms`
    pub fn trigger(&mut self, bucket: usize, now_ms: f64) {
        if let Some(flash) = self.flashes.get_mut(bucket) {
            flash.intensity = flash.intensity.saturating_add(1);
            flash.expires_at = Some(now_ms + self.window_ms);
        }
    }

    /// Reset every flash whose window has lapsed
    pub fn expire(&mut self, now_ms: f64) {
        for flash in &mut self.flashes {
            if flash.expires_at.is_some_and(|at| now_ms >= at) {
                *flash = Flash::default();
            }
        }
    }

    pub fn intensity(&self, bucket: usize) -> u32 {
        self.flashes.get(bucket).map_or(0, |f| f.intensity)
    }

    pub fn clear(&mut self) {
        self.flashes.fill(Flash::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_accumulates() {
        let mut flashes = FlashBoard::new(3, 5000.0);
        flashes.trigger(1, 0.0);
        flashes.trigger(1, 10.0);
        flashes.trigger(1, 20.0);
        assert_eq!(flashes.intensity(1), 3);
        assert_eq!(flashes.intensity(0), 0);
    }

    #[test]
    fn test_expires_after_window() {
        let mut flashes = FlashBoard::new(3, 5000.0);
        flashes.trigger(2, 1000.0);
        flashes.expire(5999.0);
        assert_eq!(flashes.intensity(2), 1);
        flashes.expire(6000.0);
        assert_eq!(flashes.intensity(2), 0);
    }

    #[test]
    fn test_new_settlement_restarts_window() {
        let mut flashes = FlashBoard::new(3, 5000.0);
        flashes.trigger(0, 0.0);
        flashes.trigger(0, 4000.0);
        flashes.expire(5000.0);
        assert_eq!(flashes.intensity(0), 2);
        flashes.expire(9000.0);
        assert_eq!(flashes.intensity(0), 0);
    }

    #[test]
    fn test_windows_are_per_bucket() {
        let mut flashes = FlashBoard::new(3, 5000.0);
        flashes.trigger(0, 0.0);
        flashes.trigger(1, 3000.0);
        flashes.expire(5000.0);
        assert_eq!(flashes.intensity(0), 0);
        assert_eq!(flashes.intensity(1), 1);
    }

    #[test]
    fn test_out_of_range_bucket_ignored() {
        let mut flashes = FlashBoard::new(2, 5000.0);
        flashes.trigger(9, 0.0);
        assert_eq!(flashes.intensity(9), 0);
        assert!((0..2).all(|b| flashes.intensity(b) == 0));
    }
}
