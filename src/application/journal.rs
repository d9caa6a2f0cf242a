use crate::domain::entities::ledger::Ledger;
use crate::domain::entities::strategy::{NewStrategy, Strategy};
use crate::domain::entities::trade::{NewTrade, Trade, TradeExit};
use crate::domain::error::DomainError;
use crate::domain::ports::blob_store::BlobStore;
use crate::domain::values::trade_status::TradeStatus;
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex, MutexGuard};

pub const TRADES_KEY: &str = "tms_trades";
pub const STRATEGIES_KEY: &str = "tms_strategies";

#[derive(Debug, Clone, Default)]
pub struct TradeFilter {
    pub status: Option<TradeStatus>,
    /// Matches `Trade::strategy` by name, case-insensitively.
    pub strategy: Option<String>,
    pub limit: Option<usize>,
}

/// Change to an open trade's risk levels. `None` leaves a level as is,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RiskEdit {
    pub stop_loss: Option<Option<f64>>,
    pub take_profit: Option<Option<f64>>,
}

impl RiskEdit {
    pub fn set_stop(mut self, stop_loss: f64) -> Self {
        self.stop_loss = Some(Some(stop_loss));
        self
    }

    pub fn set_target(mut self, take_profit: f64) -> Self {
        self.take_profit = Some(Some(take_profit));
        self
    }

    pub fn clear_stop(mut self) -> Self {
        self.stop_loss = Some(None);
        self
    }

    pub fn clear_target(mut self) -> Self {
        self.take_profit = Some(None);
        self
    }
}

/// Owns the in-memory ledger and writes it through to the blob store after
/// every mutation. A mutation that fails to persist is not applied.
pub struct JournalUseCase {
    store: Arc<dyn BlobStore>,
    ledger: Mutex<Ledger>,
}

impl JournalUseCase {
    pub fn open(store: Arc<dyn BlobStore>) -> Result<Self, DomainError> {
        let trades: Vec<Trade> = read_blob(store.as_ref(), TRADES_KEY)?.unwrap_or_default();
        let mut strategies: Vec<Strategy> =
            read_blob(store.as_ref(), STRATEGIES_KEY)?.unwrap_or_default();

        if strategies.is_empty() {
            strategies = Strategy::defaults();
            store.put(STRATEGIES_KEY, &serde_json::to_string(&strategies)?)?;
            tracing::info!(count = strategies.len(), "seeded default strategies");
        }

        tracing::debug!(
            trades = trades.len(),
            strategies = strategies.len(),
            "journal loaded"
        );
        Ok(Self {
            store,
            ledger: Mutex::new(Ledger::new(trades, strategies)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Ledger>, DomainError> {
        self.ledger
            .lock()
            .map_err(|e| DomainError::Storage(e.to_string()))
    }

    /// Runs `f` on a copy of the ledger, persists the copy, then swaps it in.
    fn mutate<T, F>(&self, f: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut Ledger) -> Result<T, DomainError>,
    {
        let mut ledger = self.lock()?;
        let mut next = ledger.clone();
        let out = f(&mut next)?;
        if next.trades() != ledger.trades() {
            self.store
                .put(TRADES_KEY, &serde_json::to_string(next.trades())?)?;
        }
        if next.strategies() != ledger.strategies() {
            self.store
                .put(STRATEGIES_KEY, &serde_json::to_string(next.strategies())?)?;
        }
        tracing::trace!(version = next.version(), "ledger committed");
        *ledger = next;
        Ok(out)
    }

    /// Snapshot of the current ledger for read-only computations.
    pub fn snapshot(&self) -> Result<Ledger, DomainError> {
        Ok(self.lock()?.clone())
    }

    pub fn add_trade(&self, input: NewTrade) -> Result<Trade, DomainError> {
        let trade = Trade::new(input)?;
        self.mutate(|ledger| {
            ledger.insert_trade(trade.clone());
            Ok(())
        })?;
        tracing::info!(
            id = %trade.id,
            symbol = %trade.symbol,
            direction = %trade.direction,
            "trade added"
        );
        Ok(trade)
    }

    pub fn close_trade(&self, id: &str, exit: TradeExit) -> Result<Trade, DomainError> {
        let now = Utc::now();
        let trade = self.mutate(|ledger| {
            ledger
                .update_trade(id, |t| t.close(exit, now))
                .map(Trade::clone)
        })?;
        tracing::info!(id, pnl = trade.pnl(), "trade closed");
        Ok(trade)
    }

    /// Edits stop and target on an open trade. Levels the edit does not
    /// mention keep their current value.
    pub fn update_risk(&self, id: &str, edit: RiskEdit) -> Result<Trade, DomainError> {
        for level in [edit.stop_loss, edit.take_profit]
            .into_iter()
            .flatten()
            .flatten()
        {
            if !(level.is_finite() && level > 0.0) {
                return Err(DomainError::InvalidInput(format!(
                    "Risk levels must be positive, got {level}"
                )));
            }
        }
        let trade = self.mutate(|ledger| {
            ledger
                .update_trade(id, |t| {
                    if !t.is_open() {
                        return Err(DomainError::InvalidInput(format!(
                            "Trade {} is closed; risk levels can only change while open",
                            t.id
                        )));
                    }
                    if let Some(stop_loss) = edit.stop_loss {
                        t.stop_loss = stop_loss;
                    }
                    if let Some(take_profit) = edit.take_profit {
                        t.take_profit = take_profit;
                    }
                    Ok(())
                })
                .map(Trade::clone)
        })?;
        tracing::debug!(
            id,
            stop_loss = ?trade.stop_loss,
            take_profit = ?trade.take_profit,
            "risk levels updated"
        );
        Ok(trade)
    }

    pub fn delete_trade(&self, id: &str) -> Result<Trade, DomainError> {
        let trade = self.mutate(|ledger| ledger.remove_trade(id))?;
        tracing::info!(id, symbol = %trade.symbol, "trade deleted");
        Ok(trade)
    }

    pub fn trades(&self, filter: &TradeFilter) -> Result<Vec<Trade>, DomainError> {
        let ledger = self.lock()?;
        let wanted = filter.strategy.as_deref().map(str::trim);
        Ok(ledger
            .trades()
            .iter()
            .filter(|t| filter.status.map_or(true, |s| t.status == s))
            .filter(|t| wanted.map_or(true, |name| t.strategy.eq_ignore_ascii_case(name)))
            .take(filter.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    pub fn trade(&self, id: &str) -> Result<Trade, DomainError> {
        self.lock()?
            .find_trade(id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("Trade not found: {id}")))
    }

    pub fn strategies(&self) -> Result<Vec<Strategy>, DomainError> {
        Ok(self.lock()?.strategies().to_vec())
    }

    pub fn add_strategy(&self, input: NewStrategy) -> Result<Strategy, DomainError> {
        let strategy = Strategy::new(input)?;
        self.mutate(|ledger| {
            if ledger
                .strategies()
                .iter()
                .any(|s| s.name.eq_ignore_ascii_case(&strategy.name))
            {
                return Err(DomainError::InvalidInput(format!(
                    "Strategy '{}' already exists",
                    strategy.name
                )));
            }
            ledger.insert_strategy(strategy.clone());
            Ok(())
        })?;
        tracing::info!(id = %strategy.id, name = %strategy.name, "strategy added");
        Ok(strategy)
    }

    pub fn update_strategy(&self, id: &str, input: NewStrategy) -> Result<Strategy, DomainError> {
        let strategy = self.mutate(|ledger| {
            let input = input.normalized()?;
            if ledger
                .strategies()
                .iter()
                .any(|s| s.id != id && s.name.eq_ignore_ascii_case(&input.name))
            {
                return Err(DomainError::InvalidInput(format!(
                    "Strategy '{}' already exists",
                    input.name
                )));
            }
            ledger
                .update_strategy(id, |s| s.redefine(input))
                .map(Strategy::clone)
        })?;
        tracing::info!(id, name = %strategy.name, "strategy updated");
        Ok(strategy)
    }

    pub fn set_strategy_active(&self, id: &str, active: bool) -> Result<Strategy, DomainError> {
        let strategy = self.mutate(|ledger| {
            ledger
                .update_strategy(id, |s| {
                    s.active = active;
                    Ok(())
                })
                .map(Strategy::clone)
        })?;
        tracing::info!(id, active, "strategy toggled");
        Ok(strategy)
    }

    pub fn toggle_strategy(&self, id: &str) -> Result<Strategy, DomainError> {
        let active = self
            .lock()?
            .find_strategy(id)
            .map(|s| s.active)
            .ok_or_else(|| DomainError::NotFound(format!("Strategy not found: {id}")))?;
        self.set_strategy_active(id, !active)
    }

    /// Trades keep their strategy name after the definition is removed.
    pub fn delete_strategy(&self, id: &str) -> Result<Strategy, DomainError> {
        let strategy = self.mutate(|ledger| ledger.remove_strategy(id))?;
        tracing::info!(id, name = %strategy.name, "strategy deleted");
        Ok(strategy)
    }
}

fn read_blob<T: DeserializeOwned>(
    store: &dyn BlobStore,
    key: &str,
) -> Result<Option<T>, DomainError> {
    match store.get(key)? {
        None => Ok(None),
        Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| {
            tracing::error!(key, error = %e, "stored blob is not valid JSON for its type");
            DomainError::Parse(format!("{key}: {e}"))
        }),
    }
}
