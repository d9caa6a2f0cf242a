//! Risk metrics snapshot derived from the trade ledger.
//!
//! Everything here is a pure function of the trades, the configured daily
//! risk budget and the evaluation instant. Nothing is cached; callers
//! recompute whenever the ledger changes.
//!
//! The risk-adjusted return is a Sharpe-like figure over *per-trade* returns
//! (`pnl / (entry_price * quantity)`), scaled by `sqrt(252)`. It is annualized
//! by trade count, not by time, so it only matches a textbook Sharpe ratio
//! when the trader closes about one trade per day.

use crate::application::calendar::start_of_day;
use crate::domain::entities::trade::Trade;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Annualization factor applied to the per-trade Sharpe-like ratio.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Default daily risk budget in account currency.
pub const DEFAULT_MAX_DAILY_RISK: f64 = 2000.0;

/// Order in which closed trades are replayed to build the equity curve for
/// drawdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawdownOrder {
    /// As stored in the ledger (newest first).
    #[default]
    Ledger,
    /// Oldest settlement first.
    Chronological,
}

impl fmt::Display for DrawdownOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawdownOrder::Ledger => write!(f, "ledger"),
            DrawdownOrder::Chronological => write!(f, "chronological"),
        }
    }
}

impl FromStr for DrawdownOrder {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ledger" => Ok(DrawdownOrder::Ledger),
            "chronological" | "chrono" => Ok(DrawdownOrder::Chronological),
            _ => Err(format!("Unknown drawdown order: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskMetrics {
    pub daily_pnl: f64,
    pub weekly_pnl: f64,
    pub monthly_pnl: f64,
    pub open_positions: usize,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    /// Percentage, 0-100.
    pub win_rate: f64,
    pub avg_win: f64,
    /// Non-negative magnitude.
    pub avg_loss: f64,
    pub profit_factor: f64,
    pub daily_risk_used: f64,
    pub max_daily_risk: f64,
}

impl RiskMetrics {
    /// All-zero snapshot carrying the configured budget.
    pub fn empty(max_daily_risk: f64) -> Self {
        Self {
            daily_pnl: 0.0,
            weekly_pnl: 0.0,
            monthly_pnl: 0.0,
            open_positions: 0,
            max_drawdown: 0.0,
            sharpe_ratio: 0.0,
            win_rate: 0.0,
            avg_win: 0.0,
            avg_loss: 0.0,
            profit_factor: 0.0,
            daily_risk_used: 0.0,
            max_daily_risk,
        }
    }

    /// Format as table for CLI output
    pub fn format_table(&self) -> String {
        format!(
            r#"
══════════════════════════════════════════════════════
                  RISK DASHBOARD
══════════════════════════════════════════════════════

P&L
───────────────────────────────────────────────────────
Today:            {:+.2}
Last 7 days:      {:+.2}
Last 30 days:     {:+.2}

PERFORMANCE
───────────────────────────────────────────────────────
Win Rate:         {:.1}%
Avg Win:          {:.2}
Avg Loss:         {:.2}
Profit Factor:    {:.2}
Max Drawdown:     {:.2}
Sharpe (trades):  {:.2}

RISK
───────────────────────────────────────────────────────
Open Positions:   {}
Daily Risk Used:  {:.2} / {:.2}
══════════════════════════════════════════════════════
"#,
            self.daily_pnl,
            self.weekly_pnl,
            self.monthly_pnl,
            self.win_rate,
            self.avg_win,
            self.avg_loss,
            self.profit_factor,
            self.max_drawdown,
            self.sharpe_ratio,
            self.open_positions,
            self.daily_risk_used,
            self.max_daily_risk,
        )
    }
}

/// Computes the snapshot with drawdown replayed in ledger order.
pub fn compute_risk_metrics<Tz: TimeZone>(
    trades: &[Trade],
    max_daily_risk: f64,
    now: &DateTime<Tz>,
) -> RiskMetrics {
    compute_risk_metrics_ordered(trades, max_daily_risk, now, DrawdownOrder::Ledger)
}

pub fn compute_risk_metrics_ordered<Tz: TimeZone>(
    trades: &[Trade],
    max_daily_risk: f64,
    now: &DateTime<Tz>,
    order: DrawdownOrder,
) -> RiskMetrics {
    let closed: Vec<&Trade> = trades.iter().filter(|t| t.is_closed()).collect();
    let open_positions = trades.iter().filter(|t| t.is_open()).count();

    if closed.is_empty() && open_positions == 0 {
        return RiskMetrics::empty(max_daily_risk);
    }

    let today = start_of_day(&now.timezone(), now.date_naive());
    let week_start = today - Duration::hours(7 * 24);
    let month_start = today - Duration::hours(30 * 24);

    let stats = OutcomeStats::from_trades(closed.iter().copied());

    let mut equity_curve = closed.clone();
    if order == DrawdownOrder::Chronological {
        equity_curve.sort_by_key(|t| t.settled_at());
    }

    let returns: Vec<f64> = closed.iter().copied().map(per_trade_return).collect();

    RiskMetrics {
        daily_pnl: pnl_since(&closed, today),
        weekly_pnl: pnl_since(&closed, week_start),
        monthly_pnl: pnl_since(&closed, month_start),
        open_positions,
        max_drawdown: max_drawdown(equity_curve.iter().map(|t| t.pnl())),
        sharpe_ratio: sharpe_like(&returns),
        win_rate: stats.win_rate(),
        avg_win: stats.avg_win(),
        avg_loss: stats.avg_loss(),
        profit_factor: stats.profit_factor(),
        daily_risk_used: daily_risk_used(trades),
        max_daily_risk,
    }
}

/// Win/loss tallies over a set of closed trades.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OutcomeStats {
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub gross_profit: f64,
    /// Sum of losing P&L, kept negative.
    pub gross_loss: f64,
}

impl OutcomeStats {
    pub fn from_trades<'a>(trades: impl IntoIterator<Item = &'a Trade>) -> Self {
        let mut stats = OutcomeStats::default();
        for trade in trades {
            stats.record(trade);
        }
        stats
    }

    pub fn record(&mut self, trade: &Trade) {
        let pnl = trade.pnl();
        self.trades += 1;
        if pnl > 0.0 {
            self.wins += 1;
            self.gross_profit += pnl;
        } else if pnl < 0.0 {
            self.losses += 1;
            self.gross_loss += pnl;
        }
    }

    /// Breakeven trades count in the denominator but not as wins.
    pub fn win_rate(&self) -> f64 {
        if self.trades == 0 {
            return 0.0;
        }
        self.wins as f64 / self.trades as f64 * 100.0
    }

    pub fn avg_win(&self) -> f64 {
        if self.wins == 0 {
            return 0.0;
        }
        self.gross_profit / self.wins as f64
    }

    pub fn avg_loss(&self) -> f64 {
        if self.losses == 0 {
            return 0.0;
        }
        (self.gross_loss / self.losses as f64).abs()
    }

    /// Zero rather than infinity when there are no losses.
    pub fn profit_factor(&self) -> f64 {
        let gross_loss = self.gross_loss.abs();
        if gross_loss > 0.0 {
            self.gross_profit / gross_loss
        } else {
            0.0
        }
    }

    pub fn total_pnl(&self) -> f64 {
        self.gross_profit + self.gross_loss
    }
}

fn pnl_since(closed: &[&Trade], start: DateTime<Utc>) -> f64 {
    closed
        .iter()
        .filter(|t| t.settled_at() >= start)
        .map(|t| t.pnl())
        .sum()
}

/// Largest peak-to-trough fall of the running P&L sum. The peak starts at 0,
/// so an opening loss counts as drawdown.
pub fn max_drawdown(pnls: impl IntoIterator<Item = f64>) -> f64 {
    let mut cumulative = 0.0;
    let mut peak = 0.0_f64;
    let mut max_dd = 0.0_f64;
    for pnl in pnls {
        cumulative += pnl;
        peak = peak.max(cumulative);
        max_dd = max_dd.max(peak - cumulative);
    }
    max_dd
}

/// Return on notional; zero when the notional is not positive.
pub fn per_trade_return(trade: &Trade) -> f64 {
    let notional = trade.notional();
    if notional > 0.0 {
        trade.pnl() / notional
    } else {
        0.0
    }
}

/// Mean over sample standard deviation (n - 1), times `sqrt(252)`.
pub fn sharpe_like(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std_dev = variance.sqrt();
    if std_dev > 0.0 {
        mean / std_dev * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        0.0
    }
}

/// Dollar distance to stop summed over open trades. A trade without a stop
/// contributes nothing here; the exposure report flags it separately.
pub fn daily_risk_used(trades: &[Trade]) -> f64 {
    trades
        .iter()
        .filter(|t| t.is_open())
        .map(|t| t.stop_risk().unwrap_or(0.0))
        .sum()
}
