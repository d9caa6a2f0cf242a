//! Configuration types for tradejournal

use crate::application::metrics::DrawdownOrder;
use crate::application::risk_exposure::RiskLimits;
use anyhow::Context;
use serde::Deserialize;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "TRADEJOURNAL_DB";
pub const ENV_MAX_DAILY_RISK: &str = "TRADEJOURNAL_MAX_DAILY_RISK";

/// Root configuration structure. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub risk: RiskLimits,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./tradejournal.db")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsConfig {
    /// Order the equity curve is walked in for max drawdown.
    #[serde(default)]
    pub drawdown_order: DrawdownOrder,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Applies `TRADEJOURNAL_*` environment overrides on top of file values.
    pub fn with_env_overrides(self) -> anyhow::Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        if let Some(path) = lookup(ENV_DB_PATH) {
            self.storage.path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_MAX_DAILY_RISK) {
            self.risk.max_daily_risk = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_MAX_DAILY_RISK} must be a number, got '{raw}'"))?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            [storage]
            path = "/var/lib/journal.db"

            [risk]
            max_daily_risk = 1500.0
            daily_loss_alert = 250.0

            [analytics]
            drawdown_order = "chronological"

            [logging]
            level = "debug"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.storage.path, PathBuf::from("/var/lib/journal.db"));
        assert_eq!(config.risk.max_daily_risk, 1500.0);
        assert_eq!(config.risk.daily_loss_alert, 250.0);
        assert_eq!(config.analytics.drawdown_order, DrawdownOrder::Chronological);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.storage.path, PathBuf::from("./tradejournal.db"));
        assert_eq!(config.risk.max_daily_risk, 2000.0);
        assert_eq!(config.risk.daily_loss_alert, 500.0);
        assert_eq!(config.analytics.drawdown_order, DrawdownOrder::Ledger);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_section() {
        let config: Config = toml::from_str("[risk]\nmax_daily_risk = 800.0\n").unwrap();
        assert_eq!(config.risk.max_daily_risk, 800.0);
        assert_eq!(config.risk.daily_loss_alert, 500.0);
    }

    #[test]
    fn test_unknown_drawdown_order_rejected() {
        assert!(toml::from_str::<Config>("[analytics]\ndrawdown_order = \"random\"\n").is_err());
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default()
            .with_overrides(|key| match key {
                ENV_DB_PATH => Some("/tmp/other.db".into()),
                ENV_MAX_DAILY_RISK => Some(" 750 ".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.storage.path, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.risk.max_daily_risk, 750.0);

        let bad = Config::default().with_overrides(|key| {
            (key == ENV_MAX_DAILY_RISK).then(|| "lots".to_string())
        });
        assert!(bad.is_err());
    }
}
