//! Startup settings
//!
//! Read once from an optional JSON file, then overridden by command-line
//! flags. Missing fields fall back to their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_PLAYERS, MIN_PLAYERS, MONSTER_STEP_MS};
use crate::error::ConfigError;

/// Game settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Number of seats (1-4)
    pub player_count: u8,
    /// Layout and deck seed; clock-derived when absent
    pub seed: Option<u64>,
    /// Delay between monster cells in the terminal front end (ms)
    pub monster_step_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_count: 2,
            seed: None,
            monster_step_ms: MONSTER_STEP_MS,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the board cannot be built from
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.player_count) {
            return Err(ConfigError::InvalidPlayerCount(self.player_count));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.player_count, 2);
        assert_eq!(settings.seed, None);
        assert_eq!(settings.monster_step_ms, MONSTER_STEP_MS);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "player_count": 4, "seed": 7 }"#).unwrap();
        assert_eq!(settings.player_count, 4);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.monster_step_ms, MONSTER_STEP_MS);
    }

    #[test]
    fn test_player_count_bounds() {
        for count in [0, 5, 9] {
            let settings = Settings {
                player_count: count,
                ..Settings::default()
            };
            assert!(matches!(
                settings.validate(),
                Err(ConfigError::InvalidPlayerCount(c)) if c == count
            ));
        }
        assert!(Settings::from_json(r#"{ "player_count": 0 }"#).is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Settings::from_json("{ player_count: "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load(Path::new("/nonexistent/spiral-chase.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/spiral-chase.json"));
    }
}
