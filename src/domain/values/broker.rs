use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Broker {
    #[default]
    #[serde(rename = "IBKR")]
    Ibkr,
    Netwealth,
    MetaTrader,
    Other,
}

impl fmt::Display for Broker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Broker::Ibkr => write!(f, "IBKR"),
            Broker::Netwealth => write!(f, "Netwealth"),
            Broker::MetaTrader => write!(f, "MetaTrader"),
            Broker::Other => write!(f, "Other"),
        }
    }
}

impl FromStr for Broker {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ibkr" | "ib" | "interactive_brokers" => Ok(Broker::Ibkr),
            "netwealth" => Ok(Broker::Netwealth),
            "metatrader" | "mt4" | "mt5" => Ok(Broker::MetaTrader),
            "other" => Ok(Broker::Other),
            _ => Err(format!("Unknown broker: {s}")),
        }
    }
}
