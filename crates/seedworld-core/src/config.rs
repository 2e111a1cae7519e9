//! Simulation parameters and their validation.
//!
//! `SimConfig` is plain serde data. Missing fields in a JSON file fall back
//! to the defaults below, so a config file only needs the knobs it changes.
//! Every `World` validates its config before seeding.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
    #[error("grid {cols}x{rows} is too small: needs the reserved cell plus at least one free cell")]
    GridTooSmall { rows: u32, cols: u32 },
    #[error("cannot place {required} entities: only {capacity} free cells")]
    Saturated { required: u64, capacity: u64 },
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Named parameters consumed by the world and by every person it creates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// People placed when a world is created
    pub initial_population: u32,
    /// Food items placed when a world is created
    pub initial_food: u32,
    /// Reproduction is refused once the population reaches this cap
    pub max_population: u32,
    /// A person dies on the tick its age exceeds this
    pub max_age: u32,
    /// Chance per adjacent partner per tick of producing a child, 0.0 to 1.0
    pub fertility: f64,
    /// Chance per tick of a food spawn attempt, 0.0 to 1.0
    pub food_chance: f64,
    /// Hunger above this makes a person eat adjacent food
    pub hunger_threshold: u32,
    /// Hunger above this kills
    pub starvation_threshold: u32,
    /// Pause between ticks in milliseconds; 0 runs unthrottled
    pub tick_delay_ms: u64,
    /// Seed for the simulation RNG; `None` draws one from entropy
    pub rng_seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            initial_population: 10,
            initial_food: 20,
            max_population: 200,
            max_age: 200,
            fertility: 0.5,
            food_chance: 0.5,
            hunger_threshold: 75,
            starvation_threshold: 100,
            tick_delay_ms: 10,
            rng_seed: None,
        }
    }
}

impl SimConfig {
    /// Parse a JSON document; absent fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Reject values that make no sense. Counts are unsigned, so negative
    /// counts never get this far.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.fertility) {
            return Err(ConfigError::invalid(
                "fertility",
                format!("must be within [0, 1], got {}", self.fertility),
            ));
        }
        if !(0.0..=1.0).contains(&self.food_chance) {
            return Err(ConfigError::invalid(
                "food_chance",
                format!("must be within [0, 1], got {}", self.food_chance),
            ));
        }
        if self.starvation_threshold <= self.hunger_threshold {
            return Err(ConfigError::invalid(
                "starvation_threshold",
                format!(
                    "must exceed hunger_threshold ({} <= {})",
                    self.starvation_threshold, self.hunger_threshold
                ),
            ));
        }
        Ok(())
    }

    /// Validate this config against a concrete grid: dimensions must leave at
    /// least one free cell besides the reserved one, and the initial
    /// population and food must fit.
    pub fn validate_for_grid(&self, rows: u32, cols: u32) -> Result<(), ConfigError> {
        self.validate()?;

        let cells = u64::from(rows) * u64::from(cols);
        if cells < 2 {
            return Err(ConfigError::GridTooSmall { rows, cols });
        }

        let capacity = cells - 1;
        let required = u64::from(self.initial_population) + u64::from(self.initial_food);
        if required > capacity {
            return Err(ConfigError::Saturated { required, capacity });
        }
        Ok(())
    }

    /// Pause between ticks, `None` when unthrottled
    pub fn tick_delay(&self) -> Option<Duration> {
        (self.tick_delay_ms > 0).then(|| Duration::from_millis(self.tick_delay_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tick_delay(), Some(Duration::from_millis(10)));
    }

    #[test]
    fn test_probability_bounds() {
        let config = SimConfig {
            fertility: 1.5,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "fertility", .. })
        ));

        let config = SimConfig {
            food_chance: -0.1,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "food_chance", .. })
        ));

        let config = SimConfig {
            food_chance: f64::NAN,
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_thresholds_must_be_ordered() {
        let config = SimConfig {
            hunger_threshold: 100,
            starvation_threshold: 100,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "starvation_threshold", .. })
        ));
    }

    #[test]
    fn test_grid_checks() {
        let config = SimConfig::default();
        assert!(matches!(
            config.validate_for_grid(1, 1),
            Err(ConfigError::GridTooSmall { .. })
        ));

        // 30 entities into 5x5 = 24 free cells
        assert!(matches!(
            config.validate_for_grid(5, 5),
            Err(ConfigError::Saturated { required: 30, capacity: 24 })
        ));

        assert!(config.validate_for_grid(6, 6).is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimConfig::from_json_str(r#"{ "initial_population": 3, "rng_seed": 42 }"#)
            .expect("valid json");
        assert_eq!(config.initial_population, 3);
        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.initial_food, SimConfig::default().initial_food);
    }

    #[test]
    fn test_negative_count_rejected_at_parse() {
        let result = SimConfig::from_json_str(r#"{ "initial_food": -1 }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_zero_delay_is_unthrottled() {
        let config = SimConfig {
            tick_delay_ms: 0,
            ..SimConfig::default()
        };
        assert_eq!(config.tick_delay(), None);
    }
}
