pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;

use crate::application::analytics::{build_report, AnalyticsReport};
use crate::application::journal::{JournalUseCase, RiskEdit, TradeFilter};
use crate::application::metrics::{compute_risk_metrics_ordered, DrawdownOrder, RiskMetrics};
use crate::application::risk_exposure::{assess_exposure, RiskLimits, RiskReport};
use crate::config::Config;
use crate::domain::entities::strategy::{NewStrategy, Strategy};
use crate::domain::entities::trade::{NewTrade, Trade, TradeExit};
use crate::domain::error::DomainError;
use crate::domain::ports::blob_store::BlobStore;
use crate::infrastructure::sqlite::blob_store::SqliteBlobStore;
use crate::infrastructure::sqlite::migrations::run_migrations;
use chrono::{DateTime, Local, TimeZone};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;

/// Settings the derived views depend on.
#[derive(Debug, Clone, Default)]
pub struct JournalSettings {
    pub limits: RiskLimits,
    pub drawdown_order: DrawdownOrder,
}

impl JournalSettings {
    pub fn validate(&self) -> Result<(), DomainError> {
        let limits = &self.limits;
        if !(limits.max_daily_risk.is_finite() && limits.max_daily_risk >= 0.0) {
            return Err(DomainError::Config(format!(
                "max_daily_risk must be a non-negative number, got {}",
                limits.max_daily_risk
            )));
        }
        if !(limits.daily_loss_alert.is_finite() && limits.daily_loss_alert >= 0.0) {
            return Err(DomainError::Config(format!(
                "daily_loss_alert must be a non-negative number, got {}",
                limits.daily_loss_alert
            )));
        }
        Ok(())
    }
}

impl From<&Config> for JournalSettings {
    fn from(config: &Config) -> Self {
        Self {
            limits: config.risk.clone(),
            drawdown_order: config.analytics.drawdown_order,
        }
    }
}

pub struct TradeJournal {
    journal_uc: JournalUseCase,
    settings: JournalSettings,
}

impl TradeJournal {
    pub fn open(config: &Config) -> Result<Self, DomainError> {
        Self::with_db(&config.storage.path, JournalSettings::from(config))
    }

    pub fn with_db(
        db_path: impl AsRef<Path>,
        settings: JournalSettings,
    ) -> Result<Self, DomainError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .map_err(|e| DomainError::Storage(format!("DB error: {e}")))?;
        if db_path != Path::new(":memory:") {
            conn.pragma_update(None, "journal_mode", "WAL")
                .map_err(|e| DomainError::Storage(format!("WAL error: {e}")))?;
        }
        run_migrations(&conn)?;
        tracing::debug!(path = %db_path.display(), "journal database ready");

        Self::with_store(Arc::new(SqliteBlobStore::new(conn)), settings)
    }

    pub fn with_store(
        store: Arc<dyn BlobStore>,
        settings: JournalSettings,
    ) -> Result<Self, DomainError> {
        settings.validate()?;
        Ok(Self {
            journal_uc: JournalUseCase::open(store)?,
            settings,
        })
    }

    // Delegating methods
    pub fn add_trade(&self, input: NewTrade) -> Result<Trade, DomainError> {
        self.journal_uc.add_trade(input)
    }

    pub fn close_trade(&self, id: &str, exit: TradeExit) -> Result<Trade, DomainError> {
        self.journal_uc.close_trade(id, exit)
    }

    pub fn update_risk(&self, id: &str, edit: RiskEdit) -> Result<Trade, DomainError> {
        self.journal_uc.update_risk(id, edit)
    }

    pub fn delete_trade(&self, id: &str) -> Result<Trade, DomainError> {
        self.journal_uc.delete_trade(id)
    }

    pub fn trade(&self, id: &str) -> Result<Trade, DomainError> {
        self.journal_uc.trade(id)
    }

    pub fn trades(&self, filter: &TradeFilter) -> Result<Vec<Trade>, DomainError> {
        self.journal_uc.trades(filter)
    }

    pub fn strategies(&self) -> Result<Vec<Strategy>, DomainError> {
        self.journal_uc.strategies()
    }

    pub fn add_strategy(&self, input: NewStrategy) -> Result<Strategy, DomainError> {
        self.journal_uc.add_strategy(input)
    }

    pub fn update_strategy(&self, id: &str, input: NewStrategy) -> Result<Strategy, DomainError> {
        self.journal_uc.update_strategy(id, input)
    }

    pub fn set_strategy_active(&self, id: &str, active: bool) -> Result<Strategy, DomainError> {
        self.journal_uc.set_strategy_active(id, active)
    }

    pub fn toggle_strategy(&self, id: &str) -> Result<Strategy, DomainError> {
        self.journal_uc.toggle_strategy(id)
    }

    pub fn delete_strategy(&self, id: &str) -> Result<Strategy, DomainError> {
        self.journal_uc.delete_strategy(id)
    }

    /// Risk metrics as of now, with day boundaries in the local timezone.
    pub fn risk_metrics(&self) -> Result<RiskMetrics, DomainError> {
        self.risk_metrics_at(&Local::now())
    }

    pub fn risk_metrics_at<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<RiskMetrics, DomainError> {
        let ledger = self.journal_uc.snapshot()?;
        Ok(compute_risk_metrics_ordered(
            ledger.trades(),
            self.settings.limits.max_daily_risk,
            now,
            self.settings.drawdown_order,
        ))
    }

    pub fn analytics(&self) -> Result<AnalyticsReport, DomainError> {
        self.analytics_at(&Local::now())
    }

    pub fn analytics_at<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<AnalyticsReport, DomainError> {
        let ledger = self.journal_uc.snapshot()?;
        Ok(build_report(ledger.trades(), ledger.strategies(), now))
    }

    pub fn risk_report(&self) -> Result<RiskReport, DomainError> {
        self.risk_report_at(&Local::now())
    }

    pub fn risk_report_at<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<RiskReport, DomainError> {
        let ledger = self.journal_uc.snapshot()?;
        let metrics = compute_risk_metrics_ordered(
            ledger.trades(),
            self.settings.limits.max_daily_risk,
            now,
            self.settings.drawdown_order,
        );
        Ok(assess_exposure(ledger.trades(), &metrics, &self.settings.limits))
    }
}
