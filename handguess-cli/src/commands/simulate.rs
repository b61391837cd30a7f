use crate::config::CliConfig;
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Table};
use handguess_core::{
    simulate, FairCoin, HandGuessError, Multiplier, OutcomeSource, Result, SeededCoin,
    SimulationPlan, SimulationReport,
};

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of rounds to play
    #[arg(short, long, default_value_t = 1000)]
    rounds: u64,

    /// Stake placed every round
    #[arg(short, long, default_value_t = 10)]
    stake: u64,

    /// Cash out once the multiplier reaches this value (2, 4, 8, 16 or 32)
    #[arg(long, default_value_t = 2)]
    cash_out_at: u64,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run_simulate(args: SimulateArgs, cli_config: &CliConfig) -> Result<()> {
    let config = cli_config.game_config()?;
    let cash_out_at = Multiplier::try_from(args.cash_out_at).map_err(|_| {
        HandGuessError::config(format!(
            "cash-out target must be one of 2, 4, 8, 16, 32 (got {})",
            args.cash_out_at
        ))
    })?;

    let plan = SimulationPlan {
        rounds: args.rounds,
        stake: args.stake,
        cash_out_at,
    };
    let source: Box<dyn OutcomeSource> = match args.seed {
        Some(seed) => Box::new(SeededCoin::new(seed)),
        None => Box::new(FairCoin),
    };

    let report = simulate(&config, &plan, source)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Played {} of {} rounds at stake {}, cashing out at {}",
            report.rounds_played, plan.rounds, plan.stake, plan.cash_out_at
        );
        println!("{}", report_table(&report));
        if report.went_broke {
            println!("Ran out of money before finishing the plan.");
        }
    }

    Ok(())
}

fn report_table(report: &SimulationReport) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Wins".to_string(), report.wins.to_string()]);
    table.add_row(vec!["Losses".to_string(), report.losses.to_string()]);
    table.add_row(vec![
        "Win rate".to_string(),
        format!("{:.2}%", report.win_rate * 100.0),
    ]);
    table.add_row(vec![
        "Starting balance".to_string(),
        report.starting_balance.to_string(),
    ]);
    table.add_row(vec![
        "Final balance".to_string(),
        report.final_balance.to_string(),
    ]);
    table.add_row(vec![
        "Peak balance".to_string(),
        report.peak_balance.to_string(),
    ]);
    table.add_row(vec!["Net".to_string(), format!("{:+}", report.net())]);
    table
}
