use serde::{Deserialize, Serialize};
use std::fmt;

/// Dollar risk at or above this is at least `Medium`.
pub const MEDIUM_RISK_THRESHOLD: f64 = 100.0;
/// Dollar risk at or above this is `High`.
pub const HIGH_RISK_THRESHOLD: f64 = 500.0;

/// Classification of an open position's dollar risk.
///
/// `Undefined` marks a position with no stop-loss. Its computed risk is zero
/// but it is not safe, so it never folds into `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Undefined,
}

impl RiskLevel {
    pub fn classify(risk_amount: f64, has_stop: bool) -> Self {
        if !has_stop {
            return RiskLevel::Undefined;
        }
        if risk_amount < MEDIUM_RISK_THRESHOLD {
            RiskLevel::Low
        } else if risk_amount < HIGH_RISK_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
            RiskLevel::Undefined => write!(f, "Undefined"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(RiskLevel::classify(99.99, true), RiskLevel::Low);
        assert_eq!(RiskLevel::classify(100.0, true), RiskLevel::Medium);
        assert_eq!(RiskLevel::classify(499.99, true), RiskLevel::Medium);
        assert_eq!(RiskLevel::classify(500.0, true), RiskLevel::High);
    }

    #[test]
    fn test_missing_stop_is_undefined() {
        assert_eq!(RiskLevel::classify(0.0, false), RiskLevel::Undefined);
        assert_ne!(RiskLevel::classify(0.0, false), RiskLevel::classify(0.0, true));
    }
}
