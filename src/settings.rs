//! Viewer preferences
//!
//! Changed from the page's option controls and kept in LocalStorage on the
//! web. Preferences only affect drawing; no game state is ever stored.

use serde::{Deserialize, Serialize};

/// Glow quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub const ALL: [QualityPreset; 3] = [QualityPreset::Low, QualityPreset::Medium, QualityPreset::High];

    /// Option value used by the quality selector
    pub fn key(self) -> &'static str {
        match self {
            QualityPreset::Low => "low",
            QualityPreset::Medium => "medium",
            QualityPreset::High => "high",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.key() == key)
    }

    /// Shadow blur multiplier for glowing pins and balls (0 = no glow)
    pub fn glow_scale(self) -> f32 {
        match self {
            QualityPreset::Low => 0.0,
            QualityPreset::Medium => 1.0,
            QualityPreset::High => 1.5,
        }
    }
}

/// On/off preferences, each bound to one checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Glow,
    BucketFlash,
    Histogram,
    Percentages,
    ReducedMotion,
}

impl Toggle {
    pub const ALL: [Toggle; 5] = [
        Toggle::Glow,
        Toggle::BucketFlash,
        Toggle::Histogram,
        Toggle::Percentages,
        Toggle::ReducedMotion,
    ];

    pub fn element_id(self) -> &'static str {
        match self {
            Toggle::Glow => "opt-glow",
            Toggle::BucketFlash => "opt-flash",
            Toggle::Histogram => "opt-histogram",
            Toggle::Percentages => "opt-percentages",
            Toggle::ReducedMotion => "opt-reduced-motion",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub quality: QualityPreset,
    /// Glow around pins and balls
    pub glow: bool,
    /// Light up buckets as balls land
    pub bucket_flash: bool,
    /// Distribution polyline under the buckets
    pub show_histogram: bool,
    /// Per-bucket share of all settled balls
    pub show_percentages: bool,
    /// No flashing buckets
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            glow: true,
            bucket_flash: true,
            show_histogram: true,
            show_percentages: true,
            reduced_motion: false,
        }
    }
}

/// LocalStorage key
#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "plinko_settings";

impl Settings {
    /// Switch quality; Low also turns glow off
    pub fn set_quality(&mut self, quality: QualityPreset) {
        self.quality = quality;
        // Canvas shadows are the expensive part with a thousand balls in flight
        if quality == QualityPreset::Low {
            self.glow = false;
        }
    }

    pub fn toggle(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::Glow => self.glow,
            Toggle::BucketFlash => self.bucket_flash,
            Toggle::Histogram => self.show_histogram,
            Toggle::Percentages => self.show_percentages,
            Toggle::ReducedMotion => self.reduced_motion,
        }
    }

    pub fn set_toggle(&mut self, toggle: Toggle, on: bool) {
        let field = match toggle {
            Toggle::Glow => &mut self.glow,
            Toggle::BucketFlash => &mut self.bucket_flash,
            Toggle::Histogram => &mut self.show_histogram,
            Toggle::Percentages => &mut self.show_percentages,
            Toggle::ReducedMotion => &mut self.reduced_motion,
        };
        *field = on;
    }

    /// Bucket flashing, unless reduced motion is on
    pub fn effective_bucket_flash(&self) -> bool {
        self.bucket_flash && !self.reduced_motion
    }

    /// Glow blur scale (0 when glow is off)
    pub fn glow_scale(&self) -> f32 {
        if self.glow {
            self.quality.glow_scale()
        } else {
            0.0
        }
    }

    /// Parse stored preferences; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[cfg(target_arch = "wasm32")]
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }

    /// Stored preferences, or defaults
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = Self::storage().and_then(|s| s.get_item(STORAGE_KEY).ok().flatten());
        match stored.as_deref().map(Self::from_json) {
            Some(Ok(settings)) => {
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            Some(Err(e)) => {
                log::warn!("Ignoring stored settings: {e}");
                Self::default()
            }
            None => Self::default(),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = Self::storage() else {
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => {
                if storage.set_item(STORAGE_KEY, &json).is_err() {
                    log::warn!("Could not store settings");
                }
            }
            Err(e) => log::warn!("Could not encode settings: {e}"),
        }
    }
}
