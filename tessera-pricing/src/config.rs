use serde::Deserialize;

/// Engine tuning knobs; loading these from a file or the environment is the
/// caller's store layer, the engine only consumes the deserialized struct.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Lower bound on the final price, as a multiple of the original
    #[serde(default = "default_min_multiplier")]
    pub min_multiplier: f64,

    /// Upper bound on the final price, as a multiple of the original
    #[serde(default = "default_max_multiplier")]
    pub max_multiplier: f64,

    /// Entries kept per seat in the price history
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

fn default_min_multiplier() -> f64 {
    0.5
}

fn default_max_multiplier() -> f64 {
    3.0
}

fn default_history_capacity() -> usize {
    100
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_multiplier: default_min_multiplier(),
            max_multiplier: default_max_multiplier(),
            history_capacity: default_history_capacity(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_multiplier <= 0.0 || self.min_multiplier > self.max_multiplier {
            return Err(ConfigError::InvalidBand {
                min: self.min_multiplier,
                max: self.max_multiplier,
            });
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroHistoryCapacity);
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid clamp band: min multiplier {min} must be positive and not above max {max}")]
    InvalidBand { min: f64, max: f64 },

    #[error("History capacity must be at least 1")]
    ZeroHistoryCapacity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_band_rejected() {
        let config = EngineConfig {
            min_multiplier: 2.0,
            max_multiplier: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBand { .. })
        ));
    }
}
