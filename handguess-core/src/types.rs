use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of the round state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Betting,
    Choosing,
    Reveal,
    BonusChoice,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Betting => write!(f, "BETTING"),
            Phase::Choosing => write!(f, "CHOOSING"),
            Phase::Reveal => write!(f, "REVEAL"),
            Phase::BonusChoice => write!(f, "BONUS_CHOICE"),
        }
    }
}

/// One of the two hands that may hold the coin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub fn other(self) -> Self {
        match self {
            Hand::Left => Hand::Right,
            Hand::Right => Hand::Left,
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hand::Left => write!(f, "left"),
            Hand::Right => write!(f, "right"),
        }
    }
}

/// Payout factor applied to the stake.
///
/// Only the powers of two from 2 up to [`Multiplier::CAP`] are constructible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u64", try_from = "u64")]
pub struct Multiplier(u64);

impl Multiplier {
    pub const INITIAL: Multiplier = Multiplier(2);
    pub const CAP: Multiplier = Multiplier(32);

    pub fn value(self) -> u64 {
        self.0
    }

    pub fn is_capped(self) -> bool {
        self >= Self::CAP
    }

    /// Next step of the progression, `None` once the cap is reached.
    pub fn doubled(self) -> Option<Self> {
        if self.is_capped() {
            None
        } else {
            Some(Multiplier(self.0 * 2))
        }
    }

    pub fn payout(self, stake: u64) -> u64 {
        stake.saturating_mul(self.0)
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl From<Multiplier> for u64 {
    fn from(multiplier: Multiplier) -> Self {
        multiplier.0
    }
}

impl TryFrom<u64> for Multiplier {
    type Error = String;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value.is_power_of_two() && (Self::INITIAL.0..=Self::CAP.0).contains(&value) {
            Ok(Multiplier(value))
        } else {
            Err(format!("invalid multiplier: {}", value))
        }
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}

/// Stake adjustment buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StakePreset {
    Min,
    Max,
    Double,
    Half,
}

/// Cosmetic flash shown right after a guess is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualEffect {
    Win,
    Lose,
}

/// Result of evaluating one guess window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuessOutcome {
    Correct,
    Wrong,
}

/// Most recent session-level event, used to pick the Betting message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LastEvent {
    Refilled,
    CashedOut { amount: u64 },
    Lost { stake: u64 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub wins: u64,
    pub losses: u64,
}

impl Stats {
    pub fn rounds(&self) -> u64 {
        self.wins + self.losses
    }

    /// Share of resolved rounds that were cashed out, 0 when none resolved.
    pub fn win_rate(&self) -> f64 {
        match self.rounds() {
            0 => 0.0,
            total => self.wins as f64 / total as f64,
        }
    }
}

/// Read-only projection of the engine handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub balance: u64,
    pub stake: u64,
    pub multiplier: Multiplier,
    pub pending_winnings: u64,
    pub chosen_hand: Option<Hand>,
    /// Only revealed once the current guess has been evaluated.
    pub correct_hand: Option<Hand>,
    pub outcome: Option<GuessOutcome>,
    pub stats: Stats,
    pub visual_effect: Option<VisualEffect>,
    pub cooling_down: bool,
    pub game_over: bool,
    pub can_place_bet: bool,
    pub can_double_up: bool,
    pub recovery_delay_enabled: bool,
    pub score_hidden: bool,
    pub last_event: Option<LastEvent>,
}
