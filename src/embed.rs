//! Components a host page can embed
//!
//! A page names the component it wants (for example through a
//! `data-embed` attribute); the name is resolved once at mount time.

use crate::tuning::{Tuning, TuningError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Embed {
    #[default]
    Plinko,
}

impl Embed {
    pub const ALL: [Embed; 1] = [Embed::Plinko];

    /// Resolve a component name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "plinko" | "plinkocomponent" => Some(Embed::Plinko),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Embed::Plinko => "plinko",
        }
    }

    /// Board tuning, with optional JSON overrides from the host page
    pub fn tuning(&self, overrides: Option<&str>) -> Result<Tuning, TuningError> {
        match (self, overrides) {
            (Embed::Plinko, Some(json)) => Tuning::from_json(json),
            (Embed::Plinko, None) => Ok(Tuning::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Embed::from_name("plinko"), Some(Embed::Plinko));
        assert_eq!(Embed::from_name("PlinkoComponent"), Some(Embed::Plinko));
        assert_eq!(Embed::from_name(" Plinko "), Some(Embed::Plinko));
        assert_eq!(Embed::from_name("roulette"), None);
        assert_eq!(Embed::from_name(""), None);
    }

    #[test]
    fn test_names_resolve_back() {
        for embed in Embed::ALL {
            assert_eq!(Embed::from_name(embed.name()), Some(embed));
        }
    }

    #[test]
    fn test_tuning_overrides() {
        let tuning = Embed::Plinko.tuning(None).unwrap();
        assert_eq!(tuning, Tuning::default());

        let tuning = Embed::Plinko.tuning(Some(r#"{ "initial_stake": 50.0 }"#)).unwrap();
        assert_eq!(tuning.initial_stake, 50.0);
        assert_eq!(tuning.board_width, 600.0);

        assert!(matches!(
            Embed::Plinko.tuning(Some(r#"{ "gravity": 0.0 }"#)),
            Err(TuningError::Gravity(_))
        ));
    }
}
