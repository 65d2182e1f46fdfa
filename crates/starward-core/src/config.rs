//! Engine configuration.

use serde::{Deserialize, Serialize};
use starward_logic::capture_odds::{ATTACKING_CREW_POWER, DEFENDING_CREW_POWER};

use crate::error::ContentError;

/// Tunable engine parameters. Every field has a default, so a partial JSON
/// object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the engine's random source. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Combat messages kept on the boarding screen.
    pub message_history: usize,
    /// Most recent ship events kept in the engine's event log.
    pub event_history: usize,
    /// Fraction of an outfit's cost it is worth second-hand.
    pub depreciation: f64,
    /// Power of each crew member attacking.
    pub attacking_crew_power: f64,
    /// Power of each crew member defending.
    pub defending_crew_power: f64,
    /// Reputation lost per required crew member of a captured ship, for
    /// governments that do not set their own penalty.
    pub capture_penalty: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            message_history: 5,
            event_history: 256,
            depreciation: 0.25,
            attacking_crew_power: ATTACKING_CREW_POWER,
            defending_crew_power: DEFENDING_CREW_POWER,
            capture_penalty: 0.1,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json(r#"{ "seed": 7, "depreciation": 0.5 }"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.depreciation, 0.5);
        assert_eq!(config.message_history, 5);
        assert_eq!(config.event_history, 256);
        assert_eq!(config.defending_crew_power, 2.0);
    }
}
