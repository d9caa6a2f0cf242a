use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentType {
    Stocks,
    Options,
    Cfds,
    Futures,
}

impl fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstrumentType::Stocks => write!(f, "stocks"),
            InstrumentType::Options => write!(f, "options"),
            InstrumentType::Cfds => write!(f, "cfds"),
            InstrumentType::Futures => write!(f, "futures"),
        }
    }
}

impl FromStr for InstrumentType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stocks" | "stock" | "equities" => Ok(InstrumentType::Stocks),
            "options" | "option" => Ok(InstrumentType::Options),
            "cfds" | "cfd" => Ok(InstrumentType::Cfds),
            "futures" | "future" => Ok(InstrumentType::Futures),
            _ => Err(format!("Unknown instrument type: {s}")),
        }
    }
}
