//! Sources of the hidden hand for each guess window.
//!
//! A source is asked for exactly one hand per guess window and is never told
//! what happened in earlier rounds, so it cannot adapt to the player.

use crate::types::Hand;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait OutcomeSource: Send {
    fn draw(&mut self) -> Hand;
}

fn hand_from(left: bool) -> Hand {
    if left {
        Hand::Left
    } else {
        Hand::Right
    }
}

/// Fair coin backed by the thread-local, OS-seeded RNG. Holds no state.
#[derive(Debug, Default, Clone, Copy)]
pub struct FairCoin;

impl OutcomeSource for FairCoin {
    fn draw(&mut self) -> Hand {
        hand_from(rand::thread_rng().gen_bool(0.5))
    }
}

/// Fair coin with a fixed seed, for reproducible simulations
#[derive(Debug, Clone)]
pub struct SeededCoin {
    rng: StdRng,
}

impl SeededCoin {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl OutcomeSource for SeededCoin {
    fn draw(&mut self) -> Hand {
        hand_from(self.rng.gen_bool(0.5))
    }
}

/// Replays a fixed list of hands, repeating the last one when exhausted.
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct Scripted {
    hands: std::collections::VecDeque<Hand>,
    last: Hand,
}

#[cfg(test)]
impl Scripted {
    pub(crate) fn new(hands: impl IntoIterator<Item = Hand>) -> Self {
        Self {
            hands: hands.into_iter().collect(),
            last: Hand::Left,
        }
    }

    pub(crate) fn always(hand: Hand) -> Self {
        Self::new([hand])
    }
}

#[cfg(test)]
impl OutcomeSource for Scripted {
    fn draw(&mut self) -> Hand {
        if let Some(hand) = self.hands.pop_front() {
            self.last = hand;
        }
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn left_frequency(source: &mut dyn OutcomeSource, draws: usize) -> f64 {
        let lefts = (0..draws).filter(|_| source.draw() == Hand::Left).count();
        lefts as f64 / draws as f64
    }

    #[test]
    fn test_fair_coin_is_balanced() {
        let frequency = left_frequency(&mut FairCoin, 100_000);
        assert!(
            (0.49..=0.51).contains(&frequency),
            "left frequency {} outside [0.49, 0.51]",
            frequency
        );
    }

    #[test]
    fn test_seeded_coin_is_balanced() {
        let frequency = left_frequency(&mut SeededCoin::new(7), 100_000);
        assert!((0.49..=0.51).contains(&frequency));
    }

    #[test]
    fn test_seeded_coin_is_reproducible() {
        let mut a = SeededCoin::new(42);
        let mut b = SeededCoin::new(42);
        let first: Vec<Hand> = (0..64).map(|_| a.draw()).collect();
        let second: Vec<Hand> = (0..64).map(|_| b.draw()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_scripted_repeats_last_hand() {
        let mut source = Scripted::new([Hand::Right, Hand::Left]);
        assert_eq!(source.draw(), Hand::Right);
        assert_eq!(source.draw(), Hand::Left);
        assert_eq!(source.draw(), Hand::Left);
    }
}
