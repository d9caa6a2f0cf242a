use clap::Parser;
use tradejournal::application::journal::{RiskEdit, TradeFilter};
use tradejournal::application::risk_exposure::planned_risk_reward;
use tradejournal::cli::commands::{Cli, Commands, OutputFormat};
use tradejournal::config::Config;
use tradejournal::domain::entities::strategy::NewStrategy;
use tradejournal::domain::entities::trade::{NewTrade, TradeExit};
use tradejournal::domain::values::trade_status::TradeStatus;
use tradejournal::TradeJournal;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            Config::default()
        }
    }
    .with_env_overrides()?;

    tradejournal::telemetry::init_logging(&config.logging.level)?;

    let journal = TradeJournal::open(&config)?;
    run_command(&journal, cli.command)
}

fn run_command(journal: &TradeJournal, cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::TradeAdd { json } => {
            let input: NewTrade = serde_json::from_str(&json)?;
            let trade = journal.add_trade(input)?;
            println!("{}", serde_json::to_string_pretty(&trade)?);
        }
        Commands::TradeClose {
            id,
            exit_price,
            reason,
            lessons,
            mistakes,
        } => {
            let trade = journal.close_trade(
                &id,
                TradeExit {
                    exit_price,
                    exit_reason: reason,
                    lessons_learned: lessons,
                    mistakes,
                },
            )?;
            println!("{}", serde_json::to_string_pretty(&trade)?);
        }
        Commands::TradeRisk {
            id,
            stop_loss,
            take_profit,
            clear_stop,
            clear_target,
        } => {
            let edit = RiskEdit {
                stop_loss: if clear_stop { Some(None) } else { stop_loss.map(Some) },
                take_profit: if clear_target { Some(None) } else { take_profit.map(Some) },
            };
            if edit == RiskEdit::default() {
                anyhow::bail!(
                    "Nothing to change: give a level to set or a --clear flag"
                );
            }
            let trade = journal.update_risk(&id, edit)?;
            println!("{}", serde_json::to_string_pretty(&trade)?);
        }
        Commands::TradeDelete { id } => {
            let trade = journal.delete_trade(&id)?;
            println!("Trade {} ({}) deleted", trade.id, trade.symbol);
        }
        Commands::Trades {
            status,
            strategy,
            limit,
        } => {
            let status = status
                .map(|s| s.parse::<TradeStatus>())
                .transpose()
                .map_err(anyhow::Error::msg)?;
            let trades = journal.trades(&TradeFilter {
                status,
                strategy,
                limit,
            })?;
            println!("{}", serde_json::to_string_pretty(&trades)?);
        }
        Commands::Plan {
            entry_price,
            quantity,
            stop_loss,
            take_profit,
        } => {
            let plan = planned_risk_reward(entry_price, quantity, stop_loss, take_profit);
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Commands::StrategyAdd { json } => {
            let input: NewStrategy = serde_json::from_str(&json)?;
            let strategy = journal.add_strategy(input)?;
            println!("{}", serde_json::to_string_pretty(&strategy)?);
        }
        Commands::StrategyUpdate { id, json } => {
            let input: NewStrategy = serde_json::from_str(&json)?;
            let strategy = journal.update_strategy(&id, input)?;
            println!("{}", serde_json::to_string_pretty(&strategy)?);
        }
        Commands::Strategies => {
            let strategies = journal.strategies()?;
            println!("{}", serde_json::to_string_pretty(&strategies)?);
        }
        Commands::StrategyToggle { id } => {
            let strategy = journal.toggle_strategy(&id)?;
            println!(
                "Strategy {} is now {}",
                strategy.name,
                if strategy.active { "active" } else { "inactive" }
            );
        }
        Commands::StrategyDelete { id } => {
            let strategy = journal.delete_strategy(&id)?;
            println!("Strategy {} deleted", strategy.name);
        }
        Commands::Metrics { format } => {
            let metrics = journal.risk_metrics()?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&metrics)?),
                OutputFormat::Table => println!("{}", metrics.format_table()),
            }
        }
        Commands::Analytics => {
            let report = journal.analytics()?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Risk => {
            let report = journal.risk_report()?;
            for alert in &report.alerts {
                tracing::warn!(kind = %alert.kind, "{}: {}", alert.title, alert.detail);
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
