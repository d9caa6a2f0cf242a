//! Trade builders for engine unit tests.

use crate::domain::entities::trade::Trade;
use crate::domain::values::broker::Broker;
use crate::domain::values::emotional_state::EmotionalState;
use crate::domain::values::instrument_type::InstrumentType;
use crate::domain::values::setup_quality::SetupQuality;
use crate::domain::values::trade_direction::TradeDirection;
use crate::domain::values::trade_status::TradeStatus;
use chrono::{DateTime, TimeZone, Utc};

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub fn open_trade(entry_price: f64, stop_loss: Option<f64>, quantity: f64) -> Trade {
    Trade {
        id: uuid::Uuid::new_v4().to_string(),
        symbol: "TEST".into(),
        direction: TradeDirection::Long,
        status: TradeStatus::Open,
        instrument_type: InstrumentType::Stocks,
        broker: Broker::Ibkr,
        strategy: "Momentum Breakout".into(),
        entry_time: at(2024, 6, 1, 12),
        entry_price,
        quantity,
        exit_time: None,
        exit_price: None,
        stop_loss,
        take_profit: None,
        realized_pnl: None,
        thesis: "test".into(),
        setup_quality: SetupQuality::default(),
        emotional_state: EmotionalState::Calm,
        market_condition: String::new(),
        exit_reason: None,
        lessons_learned: None,
        mistakes: vec![],
        tags: vec![],
        chart_urls: vec![],
    }
}

/// Closed trade on a 1000 notional (entry 100 x 10) settled at `exit_time`.
pub fn closed_trade(pnl: f64, exit_time: DateTime<Utc>) -> Trade {
    let mut t = open_trade(100.0, None, 10.0);
    t.status = TradeStatus::Closed;
    t.entry_time = exit_time;
    t.exit_time = Some(exit_time);
    t.exit_price = Some(100.0 + pnl / 10.0);
    t.realized_pnl = Some(pnl);
    t
}

pub fn with_strategy(mut t: Trade, strategy: &str) -> Trade {
    t.strategy = strategy.to_string();
    t
}

pub fn with_instrument(mut t: Trade, instrument: InstrumentType) -> Trade {
    t.instrument_type = instrument;
    t
}

pub fn with_quality(mut t: Trade, quality: u8) -> Trade {
    t.setup_quality = SetupQuality::new(quality).unwrap();
    t
}
