use crate::domain::error::DomainError;
use crate::domain::values::broker::Broker;
use crate::domain::values::emotional_state::EmotionalState;
use crate::domain::values::instrument_type::InstrumentType;
use crate::domain::values::setup_quality::SetupQuality;
use crate::domain::values::trade_direction::TradeDirection;
use crate::domain::values::trade_status::TradeStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A journaled trade. Field names on the wire are camelCase so ledgers
/// written by earlier versions of the journal load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: String,
    pub symbol: String,
    pub direction: TradeDirection,
    pub status: TradeStatus,
    pub instrument_type: InstrumentType,
    #[serde(default)]
    pub broker: Broker,
    pub strategy: String,

    pub entry_time: DateTime<Utc>,
    pub entry_price: f64,
    pub quantity: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_price: Option<f64>,

    /// A stored level of zero or below means no level was set.
    #[serde(
        default,
        deserialize_with = "positive_level",
        skip_serializing_if = "Option::is_none"
    )]
    pub stop_loss: Option<f64>,
    #[serde(
        default,
        deserialize_with = "positive_level",
        skip_serializing_if = "Option::is_none"
    )]
    pub take_profit: Option<f64>,

    /// Only meaningful once the trade is closed.
    #[serde(rename = "realizedPnL", default, skip_serializing_if = "Option::is_none")]
    pub realized_pnl: Option<f64>,

    pub thesis: String,
    #[serde(default)]
    pub setup_quality: SetupQuality,
    #[serde(default)]
    pub emotional_state: EmotionalState,
    #[serde(default)]
    pub market_condition: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lessons_learned: Option<String>,
    #[serde(default)]
    pub mistakes: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub chart_urls: Vec<String>,
}

/// Input for logging a new position.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTrade {
    pub symbol: String,
    pub direction: TradeDirection,
    pub instrument_type: InstrumentType,
    #[serde(default)]
    pub broker: Broker,
    pub strategy: String,
    pub entry_price: f64,
    pub quantity: f64,
    #[serde(default)]
    pub stop_loss: Option<f64>,
    #[serde(default)]
    pub take_profit: Option<f64>,
    pub thesis: String,
    #[serde(default = "default_setup_quality")]
    pub setup_quality: u8,
    #[serde(default)]
    pub emotional_state: EmotionalState,
    #[serde(default)]
    pub market_condition: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Backdated entry; defaults to now.
    #[serde(default)]
    pub entry_time: Option<DateTime<Utc>>,
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn positive_level<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.filter(|v| is_positive(*v)))
}

fn default_setup_quality() -> u8 {
    SetupQuality::default().value()
}

/// Post-trade facts recorded when a position is closed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TradeExit {
    pub exit_price: f64,
    #[serde(default)]
    pub exit_reason: Option<String>,
    #[serde(default)]
    pub lessons_learned: Option<String>,
    #[serde(default)]
    pub mistakes: Vec<String>,
}

impl NewTrade {
    /// Collects every problem with the input rather than stopping at the first.
    pub fn validate(&self) -> Result<SetupQuality, DomainError> {
        let mut errors = Vec::new();
        if self.symbol.trim().is_empty() {
            errors.push("Symbol is required".to_string());
        }
        if !is_positive(self.entry_price) {
            errors.push("Valid entry price is required".to_string());
        }
        if !is_positive(self.quantity) {
            errors.push("Valid quantity is required".to_string());
        }
        if self.thesis.trim().is_empty() {
            errors.push("Trade thesis is required".to_string());
        }
        if self.strategy.trim().is_empty() {
            errors.push("Strategy is required".to_string());
        }
        let quality = SetupQuality::new(self.setup_quality);
        if let Err(e) = &quality {
            errors.push(e.clone());
        }
        if let Some(stop) = self.stop_loss {
            if !is_positive(stop) {
                errors.push("Stop loss must be positive".to_string());
            }
        }
        if let Some(target) = self.take_profit {
            if !is_positive(target) {
                errors.push("Take profit must be positive".to_string());
            }
        }

        if !errors.is_empty() {
            return Err(DomainError::InvalidInput(errors.join("; ")));
        }
        quality.map_err(DomainError::InvalidInput)
    }
}

impl Trade {
    pub fn new(input: NewTrade) -> Result<Self, DomainError> {
        let setup_quality = input.validate()?;
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            symbol: input.symbol.trim().to_uppercase(),
            direction: input.direction,
            status: TradeStatus::Open,
            instrument_type: input.instrument_type,
            broker: input.broker,
            strategy: input.strategy.trim().to_string(),
            entry_time: input.entry_time.unwrap_or_else(Utc::now),
            entry_price: input.entry_price,
            quantity: input.quantity,
            exit_time: None,
            exit_price: None,
            stop_loss: input.stop_loss,
            take_profit: input.take_profit,
            realized_pnl: None,
            thesis: input.thesis,
            setup_quality,
            emotional_state: input.emotional_state,
            market_condition: input.market_condition,
            exit_reason: None,
            lessons_learned: None,
            mistakes: Vec::new(),
            tags: input.tags,
            chart_urls: Vec::new(),
        })
    }

    /// Closes the position at `exit.exit_price`, deriving realized P&L from
    /// the direction. Re-closing replaces the previous exit facts.
    pub fn close(&mut self, exit: TradeExit, at: DateTime<Utc>) -> Result<(), DomainError> {
        if !is_positive(exit.exit_price) {
            return Err(DomainError::InvalidInput(
                "Please enter an exit price".to_string(),
            ));
        }
        self.status = TradeStatus::Closed;
        self.exit_time = Some(at);
        self.exit_price = Some(exit.exit_price);
        self.realized_pnl = Some(
            self.direction
                .pnl(self.entry_price, exit.exit_price, self.quantity),
        );
        self.exit_reason = exit.exit_reason.filter(|s| !s.trim().is_empty());
        self.lessons_learned = exit.lessons_learned.filter(|s| !s.trim().is_empty());
        self.mistakes = exit
            .mistakes
            .into_iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.status == TradeStatus::Open
    }

    pub fn is_closed(&self) -> bool {
        self.status == TradeStatus::Closed
    }

    /// Realized P&L, zero while open or when never recorded.
    pub fn pnl(&self) -> f64 {
        if self.is_closed() {
            self.realized_pnl.unwrap_or(0.0)
        } else {
            0.0
        }
    }

    /// Timestamp used for time bucketing: exit time, else entry time.
    pub fn settled_at(&self) -> DateTime<Utc> {
        self.exit_time.unwrap_or(self.entry_time)
    }

    pub fn notional(&self) -> f64 {
        self.entry_price * self.quantity
    }

    /// Dollar distance to the stop, `None` when no stop is set.
    pub fn stop_risk(&self) -> Option<f64> {
        self.stop_loss
            .map(|stop| (self.entry_price - stop).abs() * self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> NewTrade {
        NewTrade {
            symbol: " aapl ".into(),
            direction: TradeDirection::Long,
            instrument_type: InstrumentType::Stocks,
            broker: Broker::Ibkr,
            strategy: "Momentum Breakout".into(),
            entry_price: 100.0,
            quantity: 10.0,
            stop_loss: Some(95.0),
            take_profit: None,
            thesis: "Breakout over resistance".into(),
            setup_quality: 7,
            emotional_state: EmotionalState::Calm,
            market_condition: String::new(),
            tags: vec![],
            entry_time: None,
        }
    }

    #[test]
    fn test_new_trade_is_open_and_normalized() {
        let trade = Trade::new(input()).unwrap();
        assert_eq!(trade.symbol, "AAPL");
        assert!(trade.is_open());
        assert_eq!(trade.pnl(), 0.0);
        assert_eq!(trade.stop_risk(), Some(50.0));
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let mut bad = input();
        bad.symbol = "".into();
        bad.quantity = 0.0;
        bad.setup_quality = 11;
        let err = Trade::new(bad).unwrap_err().to_string();
        assert!(err.contains("Symbol is required"));
        assert!(err.contains("Valid quantity is required"));
        assert!(err.contains("Setup quality"));
    }

    #[test]
    fn test_close_long() {
        let mut trade = Trade::new(input()).unwrap();
        trade
            .close(
                TradeExit {
                    exit_price: 110.0,
                    mistakes: vec![" chased ".into(), "".into()],
                    ..Default::default()
                },
                Utc::now(),
            )
            .unwrap();
        assert!(trade.is_closed());
        assert_eq!(trade.realized_pnl, Some(100.0));
        assert_eq!(trade.mistakes, vec!["chased".to_string()]);
    }

    #[test]
    fn test_close_short() {
        let mut short = input();
        short.direction = TradeDirection::Short;
        short.quantity = 5.0;
        let mut trade = Trade::new(short).unwrap();
        trade
            .close(
                TradeExit {
                    exit_price: 90.0,
                    ..Default::default()
                },
                Utc::now(),
            )
            .unwrap();
        assert_eq!(trade.pnl(), 50.0);
    }

    #[test]
    fn test_close_requires_exit_price() {
        let mut trade = Trade::new(input()).unwrap();
        assert!(trade.close(TradeExit::default(), Utc::now()).is_err());
        assert!(trade.is_open());
    }

    #[test]
    fn test_deserialize_legacy_blob() {
        let json = r#"{
            "id": "1700000000000",
            "symbol": "ES",
            "direction": "short",
            "status": "closed",
            "instrumentType": "futures",
            "broker": "IBKR",
            "strategy": "Mean Reversion",
            "entryTime": "2024-03-01T14:30:00.000Z",
            "entryPrice": 5100.0,
            "quantity": 2,
            "exitTime": "2024-03-01T15:10:00.000Z",
            "exitPrice": 5090.0,
            "realizedPnL": 20,
            "thesis": "Fade the open",
            "setupQuality": 6,
            "emotionalState": "confident",
            "marketCondition": "choppy",
            "mistakes": [],
            "performance": {"ignored": true}
        }"#;
        let trade: Trade = serde_json::from_str(json).unwrap();
        assert_eq!(trade.realized_pnl, Some(20.0));
        assert_eq!(trade.setup_quality.value(), 6);
        assert!(trade.tags.is_empty());
        assert!(trade.stop_loss.is_none());
    }

    #[test]
    fn test_zero_stop_in_blob_means_no_stop() {
        let json = r#"{
            "id": "1700000000001",
            "symbol": "AAPL",
            "direction": "long",
            "status": "open",
            "instrumentType": "stocks",
            "strategy": "Momentum Breakout",
            "entryTime": "2024-03-01T14:30:00.000Z",
            "entryPrice": 180.0,
            "quantity": 10,
            "stopLoss": 0,
            "takeProfit": null,
            "thesis": "Earnings drift"
        }"#;
        let trade: Trade = serde_json::from_str(json).unwrap();
        assert_eq!(trade.stop_loss, None);
        assert_eq!(trade.take_profit, None);
        assert_eq!(trade.stop_risk(), None);
    }
}
