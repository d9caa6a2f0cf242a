use crate::domain::entities::strategy::Strategy;
use crate::domain::entities::trade::Trade;
use crate::domain::error::DomainError;
use serde::Serialize;

/// Owned journal state: trades newest-first, strategies in creation order.
///
/// `version` increases on every successful mutation so callers can tell
/// whether derived views are stale.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Ledger {
    trades: Vec<Trade>,
    strategies: Vec<Strategy>,
    version: u64,
}

impl Ledger {
    pub fn new(trades: Vec<Trade>, strategies: Vec<Strategy>) -> Self {
        Self {
            trades,
            strategies,
            version: 0,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    pub fn find_trade(&self, id: &str) -> Option<&Trade> {
        self.trades.iter().find(|t| t.id == id)
    }

    pub fn find_strategy(&self, id: &str) -> Option<&Strategy> {
        self.strategies.iter().find(|s| s.id == id)
    }

    /// New trades go to the front.
    pub fn insert_trade(&mut self, trade: Trade) {
        self.trades.insert(0, trade);
        self.version += 1;
    }

    /// Applies `f` to the trade with `id`. The ledger is left untouched if
    /// `f` fails.
    pub fn update_trade<F>(&mut self, id: &str, f: F) -> Result<&Trade, DomainError>
    where
        F: FnOnce(&mut Trade) -> Result<(), DomainError>,
    {
        let idx = self
            .trades
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("Trade not found: {id}")))?;
        let mut updated = self.trades[idx].clone();
        f(&mut updated)?;
        self.trades[idx] = updated;
        self.version += 1;
        Ok(&self.trades[idx])
    }

    pub fn remove_trade(&mut self, id: &str) -> Result<Trade, DomainError> {
        let idx = self
            .trades
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("Trade not found: {id}")))?;
        self.version += 1;
        Ok(self.trades.remove(idx))
    }

    pub fn insert_strategy(&mut self, strategy: Strategy) {
        self.strategies.push(strategy);
        self.version += 1;
    }

    pub fn update_strategy<F>(&mut self, id: &str, f: F) -> Result<&Strategy, DomainError>
    where
        F: FnOnce(&mut Strategy) -> Result<(), DomainError>,
    {
        let idx = self
            .strategies
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("Strategy not found: {id}")))?;
        let mut updated = self.strategies[idx].clone();
        f(&mut updated)?;
        self.strategies[idx] = updated;
        self.version += 1;
        Ok(&self.strategies[idx])
    }

    /// Trades referencing the strategy by name are left as they are.
    pub fn remove_strategy(&mut self, id: &str) -> Result<Strategy, DomainError> {
        let idx = self
            .strategies
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("Strategy not found: {id}")))?;
        self.version += 1;
        Ok(self.strategies.remove(idx))
    }
}
