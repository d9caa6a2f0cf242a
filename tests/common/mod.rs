//! Shared test helpers.
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use tradejournal::domain::entities::trade::{NewTrade, Trade, TradeExit};
use tradejournal::domain::values::instrument_type::InstrumentType;
use tradejournal::domain::values::trade_direction::TradeDirection;
use tradejournal::{JournalSettings, TradeJournal};

pub fn setup() -> TradeJournal {
    TradeJournal::with_db(":memory:", JournalSettings::default()).unwrap()
}

pub fn make_trade(
    symbol: &str,
    direction: TradeDirection,
    entry_price: f64,
    quantity: f64,
    stop_loss: Option<f64>,
) -> NewTrade {
    NewTrade {
        symbol: symbol.to_string(),
        direction,
        instrument_type: InstrumentType::Stocks,
        broker: Default::default(),
        strategy: "Momentum Breakout".to_string(),
        entry_price,
        quantity,
        stop_loss,
        take_profit: None,
        thesis: "Breakout with volume".to_string(),
        setup_quality: 7,
        emotional_state: Default::default(),
        market_condition: "trending".to_string(),
        tags: vec![],
        entry_time: None,
    }
}

/// Opens and immediately closes a long position with the given P&L on a
/// 100 x 10 entry.
pub fn closed_long(journal: &TradeJournal, symbol: &str, pnl: f64) -> Trade {
    let trade = journal
        .add_trade(make_trade(symbol, TradeDirection::Long, 100.0, 10.0, None))
        .unwrap();
    journal
        .close_trade(
            &trade.id,
            TradeExit {
                exit_price: 100.0 + pnl / 10.0,
                ..Default::default()
            },
        )
        .unwrap()
}

/// Close time of a settled trade. Evaluating "today" at this instant keeps
/// date-window assertions independent of when the test runs.
pub fn settled(trade: &Trade) -> DateTime<Utc> {
    trade.exit_time.unwrap()
}
