use crate::domain::error::DomainError;
use crate::domain::values::instrument_type::InstrumentType;
use serde::{Deserialize, Serialize};

/// A named trading approach. Trades refer to it by `name`, not `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rules: Vec<String>,
    #[serde(default)]
    pub timeframe: String,
    #[serde(default)]
    pub instruments: Vec<InstrumentType>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Input for creating or replacing a strategy definition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewStrategy {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub rules: Vec<String>,
    #[serde(default)]
    pub timeframe: String,
    #[serde(default)]
    pub instruments: Vec<InstrumentType>,
}

impl NewStrategy {
    /// Trims rules, drops blank ones and checks the required fields.
    pub fn normalized(self) -> Result<Self, DomainError> {
        let rules: Vec<String> = self
            .rules
            .into_iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        if self.name.trim().is_empty() || self.description.trim().is_empty() || rules.is_empty() {
            return Err(DomainError::InvalidInput(
                "Strategy needs a name, a description and at least one rule".to_string(),
            ));
        }
        let mut instruments = Vec::new();
        for i in self.instruments {
            if !instruments.contains(&i) {
                instruments.push(i);
            }
        }
        Ok(Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            rules,
            timeframe: self.timeframe.trim().to_string(),
            instruments,
        })
    }
}

impl Strategy {
    pub fn new(input: NewStrategy) -> Result<Self, DomainError> {
        let input = input.normalized()?;
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: input.name,
            description: input.description,
            rules: input.rules,
            timeframe: input.timeframe,
            instruments: input.instruments,
            active: true,
        })
    }

    /// Replaces the definition, keeping id and active flag.
    pub fn redefine(&mut self, input: NewStrategy) -> Result<(), DomainError> {
        let input = input.normalized()?;
        self.name = input.name;
        self.description = input.description;
        self.rules = input.rules;
        self.timeframe = input.timeframe;
        self.instruments = input.instruments;
        Ok(())
    }

    /// Starter strategies for an empty journal.
    pub fn defaults() -> Vec<Strategy> {
        vec![
            Strategy {
                id: "1".into(),
                name: "Momentum Breakout".into(),
                description: "Trading breakouts with volume confirmation".into(),
                rules: vec![
                    "Price breaks above resistance".into(),
                    "Volume > 2x average".into(),
                    "RSI > 60".into(),
                ],
                timeframe: "15min".into(),
                instruments: vec![InstrumentType::Stocks, InstrumentType::Futures],
                active: true,
            },
            Strategy {
                id: "2".into(),
                name: "Mean Reversion".into(),
                description: "Counter-trend plays at extremes".into(),
                rules: vec![
                    "Price 2+ std dev from mean".into(),
                    "RSI < 30 or > 70".into(),
                    "Support/resistance nearby".into(),
                ],
                timeframe: "1h".into(),
                instruments: vec![InstrumentType::Options, InstrumentType::Cfds],
                active: true,
            },
        ]
    }
}
