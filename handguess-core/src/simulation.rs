//! Headless play-through of a fixed strategy: stake the same amount every
//! round, keep doubling up until a target multiplier, then cash out.

use crate::config::GameConfig;
use crate::engine::GameEngine;
use crate::error::Result;
use crate::outcome::OutcomeSource;
use crate::types::{Hand, Multiplier, Phase};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationPlan {
    pub rounds: u64,
    pub stake: u64,
    pub cash_out_at: Multiplier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub rounds_played: u64,
    pub wins: u64,
    pub losses: u64,
    pub win_rate: f64,
    pub starting_balance: u64,
    pub final_balance: u64,
    pub peak_balance: u64,
    pub went_broke: bool,
}

impl SimulationReport {
    pub fn net(&self) -> i128 {
        self.final_balance as i128 - self.starting_balance as i128
    }
}

/// Run `plan` against `source` with every delay collapsed to zero.
pub fn simulate(
    config: &GameConfig,
    plan: &SimulationPlan,
    source: Box<dyn OutcomeSource>,
) -> Result<SimulationReport> {
    let mut engine = GameEngine::with_source(config.instant(), source)?;
    let mut guess = Hand::Left;
    let mut peak_balance = engine.ledger().balance();

    tracing::info!(
        "Simulating {} rounds at stake {}, cashing out at {}",
        plan.rounds,
        plan.stake,
        plan.cash_out_at
    );

    for _ in 0..plan.rounds {
        engine.set_stake(plan.stake);
        if !engine.place_bet() {
            break;
        }

        while engine.choose_hand(guess) {
            guess = guess.other();
            engine.advance(Duration::ZERO);

            if engine.phase() != Phase::BonusChoice {
                break;
            }
            let reached = engine
                .round()
                .is_some_and(|round| round.multiplier() >= plan.cash_out_at);
            if reached || !engine.double_up() {
                engine.cash_out();
                engine.advance(Duration::ZERO);
                break;
            }
        }

        peak_balance = peak_balance.max(engine.ledger().balance());
    }

    let stats = engine.ledger().stats();
    let report = SimulationReport {
        rounds_played: engine.info().rounds_played,
        wins: stats.wins,
        losses: stats.losses,
        win_rate: engine.ledger().win_rate(),
        starting_balance: config.starting_balance,
        final_balance: engine.ledger().balance(),
        peak_balance,
        went_broke: engine.is_game_over(),
    };

    tracing::info!(
        "Simulation finished: {} rounds, net {}",
        report.rounds_played,
        report.net()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::{Scripted, SeededCoin};

    fn plan(rounds: u64, stake: u64, cash_out_at: u64) -> SimulationPlan {
        SimulationPlan {
            rounds,
            stake,
            cash_out_at: Multiplier::try_from(cash_out_at).unwrap(),
        }
    }

    fn deep_pockets() -> GameConfig {
        GameConfig {
            starting_balance: 1_000_000,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_alternating_guesses_against_fixed_hand() {
        let report = simulate(
            &GameConfig::default(),
            &plan(4, 10, 2),
            Box::new(Scripted::always(Hand::Left)),
        )
        .unwrap();

        assert_eq!(report.rounds_played, 4);
        assert_eq!(report.wins, 2);
        assert_eq!(report.losses, 2);
        assert_eq!(report.final_balance, 2000);
        assert_eq!(report.peak_balance, 2010);
        assert!(!report.went_broke);
    }

    #[test]
    fn test_stops_when_broke() {
        let report = simulate(
            &GameConfig::default(),
            &plan(10, 2000, 2),
            Box::new(Scripted::always(Hand::Right)),
        )
        .unwrap();

        assert_eq!(report.rounds_played, 1);
        assert_eq!(report.final_balance, 0);
        assert!(report.went_broke);
        assert_eq!(report.net(), -2000);
    }

    #[test]
    fn test_even_money_win_rate() {
        let report = simulate(
            &deep_pockets(),
            &plan(10_000, 10, 2),
            Box::new(SeededCoin::new(3)),
        )
        .unwrap();
        assert_eq!(report.rounds_played, 10_000);
        assert_eq!(report.win_rate, report.wins as f64 / 10_000.0);
        assert!((report.win_rate - 0.5).abs() < 0.03, "{}", report.win_rate);
    }

    #[test]
    fn test_chasing_the_cap_rarely_pays() {
        let report = simulate(
            &deep_pockets(),
            &plan(20_000, 10, 32),
            Box::new(SeededCoin::new(11)),
        )
        .unwrap();
        assert!((report.win_rate - 1.0 / 32.0).abs() < 0.01, "{}", report.win_rate);
        assert_eq!(report.wins + report.losses, report.rounds_played);
    }

    #[test]
    fn test_zero_rounds() {
        let report = simulate(
            &GameConfig::default(),
            &plan(0, 10, 2),
            Box::new(SeededCoin::new(1)),
        )
        .unwrap();
        assert_eq!(report.rounds_played, 0);
        assert_eq!(report.final_balance, 2000);
        assert_eq!(report.win_rate, 0.0);
    }
}
