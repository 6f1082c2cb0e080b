//! Configuration management for the cipherduel engine

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Main configuration for the engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Session and turn configuration
    pub game: GameConfig,
    /// Final-score policy
    pub scoring: ScoringConfig,
    /// Reputation delta policy
    pub reputation: ReputationConfig,
}

/// Session and turn configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Cards each player must bring to a session
    pub hand_size: usize,
    /// Turn count at which a session completes with `max_turns_reached`
    pub max_turns: u32,
    /// Advisory bound on simultaneously live sessions; exceeding it only
    /// logs a warning
    pub max_concurrent_sessions: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            hand_size: 5,
            max_turns: 100,
            max_concurrent_sessions: 64,
        }
    }
}

/// Final-score policy: `score = cards_remaining * card_weight (+ win_bonus)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub card_weight: u32,
    pub win_bonus: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            card_weight: 10,
            win_bonus: 50,
        }
    }
}

/// Reputation delta policy
///
/// The engine only constrains ordering: the winner's delta is never below
/// the loser's, and the disconnect penalty is strictly positive. The actual
/// magnitudes are an operator decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReputationConfig {
    pub win_delta: i64,
    pub loss_delta: i64,
    /// Subtracted from a disconnecting player's total
    pub disconnect_penalty: i64,
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            win_delta: 25,
            loss_delta: -10,
            disconnect_penalty: 40,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let content = fs::read_to_string(path).map_err(|e| EngineError::Configuration {
            message: format!("Failed to read config file: {}", e),
            field: "config_file".to_string(),
        })?;

        let config: EngineConfig = toml::from_str(&content).map_err(|e| EngineError::Configuration {
            message: format!("Failed to parse config file: {}", e),
            field: "config_format".to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EngineError> {
        let content = toml::to_string_pretty(self).map_err(|e| EngineError::Configuration {
            message: format!("Failed to serialize config: {}", e),
            field: "config_serialization".to_string(),
        })?;

        fs::write(path, content).map_err(|e| EngineError::Configuration {
            message: format!("Failed to write config file: {}", e),
            field: "config_write".to_string(),
        })?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.game.hand_size == 0 {
            return Err(EngineError::Configuration {
                message: "Hand size must be greater than 0".to_string(),
                field: "game.hand_size".to_string(),
            });
        }

        if self.game.max_turns == 0 {
            return Err(EngineError::Configuration {
                message: "Max turns must be greater than 0".to_string(),
                field: "game.max_turns".to_string(),
            });
        }

        if self.game.max_concurrent_sessions == 0 {
            return Err(EngineError::Configuration {
                message: "Max concurrent sessions must be greater than 0".to_string(),
                field: "game.max_concurrent_sessions".to_string(),
            });
        }

        if self.scoring.card_weight == 0 {
            return Err(EngineError::Configuration {
                message: "Card weight must be greater than 0".to_string(),
                field: "scoring.card_weight".to_string(),
            });
        }

        if self.reputation.win_delta < self.reputation.loss_delta {
            return Err(EngineError::Configuration {
                message: "Winner delta must not be below loser delta".to_string(),
                field: "reputation.deltas".to_string(),
            });
        }

        if self.reputation.disconnect_penalty <= 0 {
            return Err(EngineError::Configuration {
                message: "Disconnect penalty must be strictly positive".to_string(),
                field: "reputation.disconnect_penalty".to_string(),
            });
        }

        Ok(())
    }

    /// Create a production-ready configuration
    pub fn production() -> Self {
        Self {
            game: GameConfig {
                hand_size: 5,
                max_turns: 60,
                max_concurrent_sessions: 32,
            },
            scoring: ScoringConfig {
                card_weight: 10,
                win_bonus: 100,
            },
            reputation: ReputationConfig {
                win_delta: 20,
                loss_delta: -20,
                disconnect_penalty: 60,
            },
        }
    }

    /// Create a development configuration with relaxed settings
    pub fn development() -> Self {
        Self {
            game: GameConfig {
                hand_size: 5,
                max_turns: 200,
                max_concurrent_sessions: 256,
            },
            scoring: ScoringConfig::default(),
            reputation: ReputationConfig::default(),
        }
    }
}
