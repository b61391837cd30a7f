use crate::types::StakePreset;

/// Keeps the session stake inside `[min_bet, min(balance, max_bet)]`.
///
/// Out-of-range input is clamped, never rejected. When the balance itself is
/// below `min_bet` the clamp bottoms out at `min_bet`, which leaves the stake
/// above the balance so no bet can be placed.
#[derive(Debug, Clone)]
pub struct BetController {
    min_bet: u64,
    max_bet: u64,
    stake: u64,
}

impl BetController {
    pub fn new(min_bet: u64, max_bet: u64) -> Self {
        Self {
            min_bet,
            max_bet,
            stake: min_bet,
        }
    }

    pub fn stake(&self) -> u64 {
        self.stake
    }

    pub fn min_bet(&self) -> u64 {
        self.min_bet
    }

    pub fn max_bet(&self) -> u64 {
        self.max_bet
    }

    fn clamp(&self, value: u64, balance: u64) -> u64 {
        value.min(balance).min(self.max_bet).max(self.min_bet)
    }

    pub fn set_stake(&mut self, value: u64, balance: u64) -> u64 {
        self.stake = self.clamp(value, balance);
        self.stake
    }

    pub fn apply_preset(&mut self, preset: StakePreset, balance: u64) -> u64 {
        let target = match preset {
            StakePreset::Min => self.min_bet,
            StakePreset::Max => balance.min(self.max_bet),
            StakePreset::Double => self.stake.saturating_mul(2),
            StakePreset::Half => self.stake / 2,
        };
        self.set_stake(target, balance)
    }

    /// Pull the stake back into range after the balance changed.
    pub fn reclamp(&mut self, balance: u64) -> u64 {
        self.set_stake(self.stake, balance)
    }

    pub fn reset(&mut self) {
        self.stake = self.min_bet;
    }

    /// Stake-related part of the bet guard; phase and cooldown are checked
    /// by the engine.
    pub fn is_affordable(&self, balance: u64) -> bool {
        balance >= self.min_bet && self.stake >= self.min_bet && self.stake <= balance
    }
}
