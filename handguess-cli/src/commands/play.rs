use crate::config::CliConfig;
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Table};
use dialoguer::{Input, Select};
use handguess_core::{
    message_for, FairCoin, GameSession, GuessOutcome, Hand, HandGuessError, MessageKey,
    OutcomeSource, Phase, Result, SeededCoin, Snapshot, StakePreset,
};

#[derive(Args)]
pub struct PlayArgs {
    /// Pause briefly after every resolved round
    #[arg(long)]
    recovery_delay: bool,

    /// Mask balance and amounts on screen
    #[arg(long)]
    hide_score: bool,

    /// Seed the hidden-hand draws for a reproducible session
    #[arg(long)]
    seed: Option<u64>,
}

enum BettingAction {
    PlaceBet,
    Preset(StakePreset),
    SetStake,
    ToggleRecovery,
    ToggleScore,
    Stats,
    Quit,
}

static BETTING_MENU: [(&str, BettingAction); 10] = [
    ("Place bet", BettingAction::PlaceBet),
    ("Stake: minimum", BettingAction::Preset(StakePreset::Min)),
    ("Stake: half", BettingAction::Preset(StakePreset::Half)),
    ("Stake: double", BettingAction::Preset(StakePreset::Double)),
    ("Stake: maximum", BettingAction::Preset(StakePreset::Max)),
    ("Stake: enter amount", BettingAction::SetStake),
    ("Toggle recovery delay", BettingAction::ToggleRecovery),
    ("Toggle score display", BettingAction::ToggleScore),
    ("Show statistics", BettingAction::Stats),
    ("Quit", BettingAction::Quit),
];

pub async fn run_play(args: PlayArgs, cli_config: &CliConfig) -> Result<()> {
    let config = cli_config.game_config()?;
    let source: Box<dyn OutcomeSource> = match args.seed {
        Some(seed) => Box::new(SeededCoin::new(seed)),
        None => Box::new(FairCoin),
    };

    let session = GameSession::with_source(config, source)?;
    session.set_recovery_delay(args.recovery_delay);
    session.set_score_hidden(args.hide_score);

    let limits = session.config();
    println!("Guess the hand that hides the coin. Double up or cash out.");
    println!(
        "Bets from {} to {}, starting balance {}.",
        limits.min_bet, limits.max_bet, limits.starting_balance
    );
    println!();

    loop {
        let snapshot = session.snapshot();
        print_status(&snapshot);

        match snapshot.phase {
            Phase::Betting if snapshot.game_over => {
                let items = ["Refill balance", "Show statistics", "Quit"];
                match select("Out of money", &items, 0).await? {
                    0 => {
                        session.refill();
                    }
                    1 => print_stats(&session),
                    _ => break,
                }
            }

            Phase::Betting if snapshot.cooling_down => {
                session.wait_for(|s| !s.cooling_down).await?;
            }

            Phase::Betting => {
                let labels: Vec<&str> = BETTING_MENU.iter().map(|(label, _)| *label).collect();
                let choice = select("What next?", &labels, 0).await?;

                match &BETTING_MENU[choice].1 {
                    BettingAction::PlaceBet => {
                        if !session.place_bet() {
                            println!("Cannot place a bet right now.");
                        }
                    }
                    BettingAction::Preset(preset) => {
                        session.adjust_stake(*preset);
                    }
                    BettingAction::SetStake => {
                        let value = input_stake(snapshot.stake).await?;
                        session.set_stake(value);
                    }
                    BettingAction::ToggleRecovery => {
                        session.set_recovery_delay(!snapshot.recovery_delay_enabled);
                    }
                    BettingAction::ToggleScore => {
                        session.set_score_hidden(!snapshot.score_hidden);
                    }
                    BettingAction::Stats => print_stats(&session),
                    BettingAction::Quit => break,
                }
            }

            Phase::Choosing => {
                let hand = match select("Which hand?", &["Left", "Right"], 0).await? {
                    0 => Hand::Left,
                    _ => Hand::Right,
                };
                session.choose_hand(hand);
                print_status(&session.snapshot());

                let revealed = session.wait_for(|s| s.outcome.is_some()).await?;
                if let Some(correct) = revealed.correct_hand {
                    println!("The coin was in the {} hand.", correct);
                }
                if revealed.outcome == Some(GuessOutcome::Wrong) {
                    print_status(&revealed);
                    session.wait_for(|s| s.phase == Phase::Betting).await?;
                }
            }

            Phase::BonusChoice => {
                let mut items = vec!["Cash out"];
                if snapshot.can_double_up {
                    items.push("Double up");
                }
                match select("Cash out or double up?", &items, 0).await? {
                    0 => {
                        session.cash_out();
                    }
                    _ => {
                        session.double_up();
                    }
                }
            }

            Phase::Reveal => {
                session.wait_for(|s| s.phase != Phase::Reveal).await?;
            }
        }
    }

    print_stats(&session);
    Ok(())
}

async fn select(prompt: &str, items: &[&str], default: usize) -> Result<usize> {
    let prompt = prompt.to_string();
    let items: Vec<String> = items.iter().map(|item| item.to_string()).collect();

    tokio::task::spawn_blocking(move || {
        Select::new()
            .with_prompt(prompt)
            .items(&items)
            .default(default)
            .interact()
            .map_err(|e| HandGuessError::dialog(e.to_string()))
    })
    .await
    .map_err(|e| HandGuessError::internal(format!("Prompt task failed: {}", e)))?
}

async fn input_stake(current: u64) -> Result<u64> {
    tokio::task::spawn_blocking(move || {
        Input::<u64>::new()
            .with_prompt("Stake")
            .default(current)
            .interact_text()
            .map_err(|e| HandGuessError::dialog(e.to_string()))
    })
    .await
    .map_err(|e| HandGuessError::internal(format!("Prompt task failed: {}", e)))?
}

fn print_status(snapshot: &Snapshot) {
    println!("{}", render_message(message_for(snapshot), snapshot.score_hidden));
    println!(
        "  Balance: {}  Stake: {}  Multiplier: {}",
        amount(snapshot.balance, snapshot.score_hidden),
        amount(snapshot.stake, snapshot.score_hidden),
        snapshot.multiplier
    );
}

fn print_stats(session: &GameSession) {
    let snapshot = session.snapshot();
    let info = session.info();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Session", "Value"]);
    table.add_row(vec!["ID".to_string(), info.id.to_string()]);
    table.add_row(vec![
        "Started".to_string(),
        info.started_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    ]);
    table.add_row(vec!["Rounds played".to_string(), info.rounds_played.to_string()]);
    table.add_row(vec!["Wins".to_string(), snapshot.stats.wins.to_string()]);
    table.add_row(vec!["Losses".to_string(), snapshot.stats.losses.to_string()]);
    table.add_row(vec![
        "Win rate".to_string(),
        format!("{:.1}%", snapshot.stats.win_rate() * 100.0),
    ]);
    table.add_row(vec![
        "Balance".to_string(),
        amount(snapshot.balance, snapshot.score_hidden),
    ]);

    println!("{}", table);
}

fn amount(value: u64, hidden: bool) -> String {
    if hidden {
        "***".to_string()
    } else {
        value.to_string()
    }
}

fn render_message(key: MessageKey, hidden: bool) -> String {
    match key {
        MessageKey::PlaceBet => "Place your bet.".to_string(),
        MessageKey::GoodLuck => "Balance refilled. Good luck!".to_string(),
        MessageKey::GuessFor { amount: value } => {
            format!("Pick a hand to win {}.", amount(value, hidden))
        }
        MessageKey::Revealing => "Revealing...".to_string(),
        MessageKey::Win => "Correct! Cash out or double up.".to_string(),
        MessageKey::MaxMultiplier => "Maximum multiplier reached. Cash out!".to_string(),
        MessageKey::WrongHand => "Wrong hand. The stake is lost.".to_string(),
        MessageKey::GameOver => "Game over. Refill to keep playing.".to_string(),
        MessageKey::NextBet => "Place your next bet.".to_string(),
        MessageKey::YouWon { amount: value } => format!("You won {}!", amount(value, hidden)),
        MessageKey::TakeBreak => "Take a short break...".to_string(),
    }
}
