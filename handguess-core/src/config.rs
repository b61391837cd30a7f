use crate::error::{HandGuessError, Result};
use crate::types::Multiplier;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_MIN_BET: u64 = 10;
pub const DEFAULT_MAX_BET: u64 = 5000;
pub const DEFAULT_STARTING_BALANCE: u64 = 2000;
pub const DEFAULT_REVEAL_DELAY_MS: u64 = 1500;
pub const DEFAULT_MESSAGE_DELAY_MS: u64 = 2500;
pub const DEFAULT_EFFECT_DURATION_MS: u64 = 500;
pub const DEFAULT_RECOVERY_DELAY_MS: u64 = 5000;

/// Tunable constants of a game session.
///
/// Every field has a default, so a config file only needs the values it
/// overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub min_bet: u64,
    pub max_bet: u64,
    pub starting_balance: u64,
    pub reveal_delay_ms: u64,
    pub message_delay_ms: u64,
    pub effect_duration_ms: u64,
    pub recovery_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_bet: DEFAULT_MIN_BET,
            max_bet: DEFAULT_MAX_BET,
            starting_balance: DEFAULT_STARTING_BALANCE,
            reveal_delay_ms: DEFAULT_REVEAL_DELAY_MS,
            message_delay_ms: DEFAULT_MESSAGE_DELAY_MS,
            effect_duration_ms: DEFAULT_EFFECT_DURATION_MS,
            recovery_delay_ms: DEFAULT_RECOVERY_DELAY_MS,
        }
    }
}

impl GameConfig {
    /// Same bet limits, every delay set to zero. Used by the simulator.
    pub fn instant(&self) -> Self {
        Self {
            reveal_delay_ms: 0,
            message_delay_ms: 0,
            effect_duration_ms: 0,
            recovery_delay_ms: 0,
            ..self.clone()
        }
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn message_delay(&self) -> Duration {
        Duration::from_millis(self.message_delay_ms)
    }

    pub fn effect_duration(&self) -> Duration {
        Duration::from_millis(self.effect_duration_ms)
    }

    pub fn recovery_delay(&self) -> Duration {
        Duration::from_millis(self.recovery_delay_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_bet == 0 {
            return Err(HandGuessError::config("min_bet must be greater than 0"));
        }

        if self.min_bet > self.max_bet {
            return Err(HandGuessError::config(format!(
                "min_bet ({}) cannot exceed max_bet ({})",
                self.min_bet, self.max_bet
            )));
        }

        if self.starting_balance < self.min_bet {
            return Err(HandGuessError::config(format!(
                "starting_balance ({}) must be at least min_bet ({})",
                self.starting_balance, self.min_bet
            )));
        }

        if self.max_bet.checked_mul(Multiplier::CAP.value()).is_none() {
            return Err(HandGuessError::config(format!(
                "max_bet ({}) overflows the maximum payout",
                self.max_bet
            )));
        }

        Ok(())
    }

    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
