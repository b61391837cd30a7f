use handguess_core::{message_for, GameConfig, GameEngine, Hand, Phase, SeededCoin};
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = GameConfig::default();
    let mut engine = GameEngine::with_source(config.clone(), Box::new(SeededCoin::new(7)))?;

    println!("Session {} started", engine.info().id);
    println!("Balance: {}", engine.ledger().balance());

    engine.set_stake(100);
    engine.place_bet();
    println!("\nStaked {}, balance now {}", engine.stake(), engine.ledger().balance());
    println!("Status: {:?}", message_for(&engine.snapshot()));

    engine.choose_hand(Hand::Left);
    println!("Guessed the left hand, waiting {:?}", config.reveal_delay());
    engine.advance(config.reveal_delay());

    let snapshot = engine.snapshot();
    if let Some(hand) = snapshot.correct_hand {
        println!("The coin was in the {} hand", hand);
    }

    if snapshot.phase == Phase::BonusChoice {
        println!("Correct! {} pending at {}", snapshot.pending_winnings, snapshot.multiplier);
        engine.cash_out();
    } else {
        println!("Wrong hand, stake lost");
        engine.advance(config.message_delay());
    }

    let snapshot = engine.snapshot();
    println!("\nStatus: {:?}", message_for(&snapshot));
    println!("Balance: {}", snapshot.balance);
    println!("Wins: {}, losses: {}", snapshot.stats.wins, snapshot.stats.losses);

    println!("\nExample completed successfully!");

    Ok(())
}
