//! Double-or-nothing hand-guess simulator
//!
//! A player stakes play money, guesses which hand hides the prize, and after
//! a correct guess either cashes out or doubles up against a fresh hand, up
//! to a 32x multiplier. [`GameEngine`] is the synchronous state machine;
//! [`GameSession`] runs its delays on a tokio runtime.

pub mod bet;
pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod message;
pub mod outcome;
pub mod round;
pub mod session;
pub mod simulation;
pub mod timing;
pub mod types;

pub use config::GameConfig;
pub use engine::{GameEngine, SessionInfo};
pub use error::{HandGuessError, Result};
pub use message::{message_for, MessageKey};
pub use outcome::{FairCoin, OutcomeSource, SeededCoin};
pub use session::GameSession;
pub use simulation::{simulate, SimulationPlan, SimulationReport};
pub use types::{
    GuessOutcome, Hand, LastEvent, Multiplier, Phase, Snapshot, StakePreset, Stats, VisualEffect,
};

/// Start a session with a fair coin on the current tokio runtime
pub fn start_session(config: GameConfig) -> Result<GameSession> {
    GameSession::new(config)
}
