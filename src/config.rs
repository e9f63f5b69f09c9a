//! Battle rules configuration, loadable from RON.

use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Seed for the battle's RNG stream.
    pub seed: u64,
    /// Inverse-battle challenge: weaknesses and resistances swap.
    pub inverse_type_chart: bool,
    pub crit_multiplier: f32,
    /// Test override that skips every critical-hit roll.
    pub never_crit: bool,
    pub weather_turns: u8,
    pub terrain_turns: u8,
    pub screen_turns: u8,
    pub trick_room_turns: u8,
    pub tailwind_turns: u8,
    /// A battle still running after this many turns ends in a draw.
    pub max_turns: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            inverse_type_chart: false,
            crit_multiplier: 1.5,
            never_crit: false,
            weather_turns: 5,
            terrain_turns: 5,
            screen_turns: 5,
            trick_room_turns: 5,
            tailwind_turns: 4,
            max_turns: 200,
        }
    }
}

impl BattleConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self { seed, ..Self::default() }
    }

    pub fn from_ron_str(text: &str) -> ConfigResult<Self> {
        let config: BattleConfig = ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_ron_str(&text)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.crit_multiplier < 1.0 {
            return Err(ConfigError::Invalid(format!(
                "crit_multiplier must be at least 1.0, got {}",
                self.crit_multiplier
            )));
        }
        if self.max_turns == 0 {
            return Err(ConfigError::Invalid("max_turns must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_ron_falls_back_to_defaults() {
        let config = BattleConfig::from_ron_str("(seed: 42, inverse_type_chart: true)").unwrap();
        assert_eq!(config.seed, 42);
        assert!(config.inverse_type_chart);
        assert_eq!(config.crit_multiplier, 1.5);
        assert_eq!(config.max_turns, 200);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let result = BattleConfig::from_ron_str("(crit_multiplier: 0.5)");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_ron_is_a_parse_error() {
        let result = BattleConfig::from_ron_str("(seed: \"nope\")");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
