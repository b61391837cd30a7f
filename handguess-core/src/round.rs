use crate::types::{GuessOutcome, Hand, Multiplier};
use serde::Serialize;

/// One bet-to-resolution cycle. Lives from bet placement until reset.
#[derive(Debug, Clone, Serialize)]
pub struct Round {
    stake: u64,
    multiplier: Multiplier,
    correct_hand: Hand,
    chosen_hand: Option<Hand>,
    outcome: Option<GuessOutcome>,
}

impl Round {
    pub(crate) fn open(stake: u64, correct_hand: Hand) -> Self {
        Self {
            stake,
            multiplier: Multiplier::INITIAL,
            correct_hand,
            chosen_hand: None,
            outcome: None,
        }
    }

    pub fn stake(&self) -> u64 {
        self.stake
    }

    pub fn multiplier(&self) -> Multiplier {
        self.multiplier
    }

    pub fn chosen_hand(&self) -> Option<Hand> {
        self.chosen_hand
    }

    pub fn outcome(&self) -> Option<GuessOutcome> {
        self.outcome
    }

    /// The hidden hand, available only once the guess was evaluated.
    pub fn revealed_hand(&self) -> Option<Hand> {
        self.outcome.map(|_| self.correct_hand)
    }

    pub fn pending_winnings(&self) -> u64 {
        match self.outcome {
            Some(GuessOutcome::Correct) => self.multiplier.payout(self.stake),
            _ => 0,
        }
    }

    pub fn can_double_up(&self) -> bool {
        self.outcome == Some(GuessOutcome::Correct) && !self.multiplier.is_capped()
    }

    /// Accept the single guess of this window.
    pub(crate) fn choose(&mut self, hand: Hand) -> bool {
        if self.chosen_hand.is_some() {
            return false;
        }
        self.chosen_hand = Some(hand);
        true
    }

    pub(crate) fn evaluate(&mut self) -> Option<GuessOutcome> {
        if self.outcome.is_some() {
            return None;
        }
        let chosen = self.chosen_hand?;
        let outcome = if chosen == self.correct_hand {
            GuessOutcome::Correct
        } else {
            GuessOutcome::Wrong
        };
        self.outcome = Some(outcome);
        Some(outcome)
    }

    /// Open the next guess window at twice the multiplier.
    pub(crate) fn double_up(&mut self, correct_hand: Hand) -> bool {
        if !self.can_double_up() {
            return false;
        }
        let Some(next) = self.multiplier.doubled() else {
            return false;
        };
        self.multiplier = next;
        self.correct_hand = correct_hand;
        self.chosen_hand = None;
        self.outcome = None;
        true
    }
}
