use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "tradejournal", about = "Trade journal with risk metrics and analytics")]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true, default_value = "tradejournal.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log a new open trade
    TradeAdd {
        /// JSON with symbol, direction, instrument_type, strategy, entry_price, quantity, thesis,
        /// and optional broker, stop_loss, take_profit, setup_quality, emotional_state,
        /// market_condition, tags, entry_time
        json: String,
    },
    /// Close a trade at an exit price
    TradeClose {
        /// Trade ID
        id: String,
        #[arg(long)]
        exit_price: f64,
        #[arg(long)]
        reason: Option<String>,
        #[arg(long)]
        lessons: Option<String>,
        /// Comma-separated list of mistakes
        #[arg(long, value_delimiter = ',')]
        mistakes: Vec<String>,
    },
    /// Move or clear stop loss and take profit on an open trade; levels not
    /// given are left as they are
    TradeRisk {
        /// Trade ID
        id: String,
        #[arg(long, conflicts_with = "clear_stop")]
        stop_loss: Option<f64>,
        #[arg(long, conflicts_with = "clear_target")]
        take_profit: Option<f64>,
        /// Remove the stop loss
        #[arg(long)]
        clear_stop: bool,
        /// Remove the take profit
        #[arg(long)]
        clear_target: bool,
    },
    /// Delete a trade
    TradeDelete {
        /// Trade ID
        id: String,
    },
    /// List trades, newest first
    Trades {
        /// open or closed
        #[arg(long)]
        status: Option<String>,
        /// Strategy name
        #[arg(long)]
        strategy: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Planned risk and reward for a prospective entry
    Plan {
        #[arg(long)]
        entry_price: f64,
        #[arg(long)]
        quantity: f64,
        #[arg(long)]
        stop_loss: Option<f64>,
        #[arg(long)]
        take_profit: Option<f64>,
    },
    /// Define a strategy
    StrategyAdd {
        /// JSON with name, description, rules, and optional timeframe, instruments
        json: String,
    },
    /// Replace a strategy definition
    StrategyUpdate {
        /// Strategy ID
        id: String,
        /// JSON with name, description, rules, and optional timeframe, instruments
        json: String,
    },
    /// List strategies
    Strategies,
    /// Flip a strategy between active and inactive
    StrategyToggle {
        /// Strategy ID
        id: String,
    },
    /// Delete a strategy (trades keep its name)
    StrategyDelete {
        /// Strategy ID
        id: String,
    },
    /// Risk metrics snapshot
    Metrics {
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    /// Performance analytics report
    Analytics,
    /// Open-position exposure and alerts
    Risk,
}
