//! Status line selection, kept apart from the state machine.
//!
//! [`message_for`] is a pure function of a [`Snapshot`]; rendering a key into
//! text in some language is the front-end's job.

use crate::types::{GuessOutcome, LastEvent, Phase, Snapshot};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "key", rename_all = "snake_case")]
pub enum MessageKey {
    PlaceBet,
    GoodLuck,
    GuessFor { amount: u64 },
    Revealing,
    Win,
    MaxMultiplier,
    WrongHand,
    GameOver,
    NextBet,
    YouWon { amount: u64 },
    TakeBreak,
}

pub fn message_for(snapshot: &Snapshot) -> MessageKey {
    match snapshot.phase {
        Phase::Betting if snapshot.game_over => MessageKey::GameOver,
        Phase::Betting if snapshot.cooling_down => MessageKey::TakeBreak,
        Phase::Betting => match snapshot.last_event {
            None => MessageKey::PlaceBet,
            Some(LastEvent::Refilled) => MessageKey::GoodLuck,
            Some(LastEvent::CashedOut { amount }) => MessageKey::YouWon { amount },
            Some(LastEvent::Lost { .. }) => MessageKey::NextBet,
        },
        Phase::Choosing => MessageKey::GuessFor {
            amount: snapshot.multiplier.payout(snapshot.stake),
        },
        Phase::Reveal => match snapshot.outcome {
            Some(GuessOutcome::Wrong) => MessageKey::WrongHand,
            _ => MessageKey::Revealing,
        },
        Phase::BonusChoice if snapshot.multiplier.is_capped() => MessageKey::MaxMultiplier,
        Phase::BonusChoice => MessageKey::Win,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Scripted;
    use crate::types::Hand;
    use crate::{GameConfig, GameEngine};
    use std::time::Duration;

    fn engine(hand: Hand) -> GameEngine {
        GameEngine::with_source(GameConfig::default(), Box::new(Scripted::always(hand))).unwrap()
    }

    #[test]
    fn test_messages_through_a_lost_round() {
        let mut engine = engine(Hand::Right);
        assert_eq!(message_for(&engine.snapshot()), MessageKey::PlaceBet);

        engine.set_stake(100);
        engine.place_bet();
        assert_eq!(
            message_for(&engine.snapshot()),
            MessageKey::GuessFor { amount: 200 }
        );

        engine.choose_hand(Hand::Left);
        assert_eq!(message_for(&engine.snapshot()), MessageKey::Revealing);

        engine.advance(Duration::from_millis(1500));
        assert_eq!(message_for(&engine.snapshot()), MessageKey::WrongHand);

        engine.advance(Duration::from_millis(2500));
        assert_eq!(message_for(&engine.snapshot()), MessageKey::NextBet);
    }

    #[test]
    fn test_messages_through_a_won_round() {
        let mut engine = engine(Hand::Left);
        engine.set_recovery_delay(true);
        engine.place_bet();
        engine.choose_hand(Hand::Left);
        engine.advance(Duration::from_millis(1500));
        assert_eq!(message_for(&engine.snapshot()), MessageKey::Win);

        engine.double_up();
        assert_eq!(
            message_for(&engine.snapshot()),
            MessageKey::GuessFor { amount: 40 }
        );

        engine.choose_hand(Hand::Left);
        engine.advance(Duration::from_millis(1500));
        engine.cash_out();
        assert_eq!(message_for(&engine.snapshot()), MessageKey::TakeBreak);

        engine.advance(Duration::from_millis(5000));
        assert_eq!(
            message_for(&engine.snapshot()),
            MessageKey::YouWon { amount: 40 }
        );
    }

    #[test]
    fn test_max_multiplier_message() {
        let mut engine = engine(Hand::Left);
        engine.place_bet();
        engine.choose_hand(Hand::Left);
        engine.advance(Duration::from_millis(1500));
        while engine.double_up() {
            engine.choose_hand(Hand::Left);
            engine.advance(Duration::from_millis(1500));
        }
        assert_eq!(message_for(&engine.snapshot()), MessageKey::MaxMultiplier);
    }

    #[test]
    fn test_game_over_then_good_luck() {
        let mut engine = engine(Hand::Right);
        engine.set_stake(2000);
        engine.place_bet();
        engine.choose_hand(Hand::Left);
        engine.advance(Duration::from_secs(10));
        assert_eq!(message_for(&engine.snapshot()), MessageKey::GameOver);

        engine.refill();
        assert_eq!(message_for(&engine.snapshot()), MessageKey::GoodLuck);
    }
}
