//! Open-position risk annotations, stop-loss compliance and budget alerts.

use crate::application::metrics::{RiskMetrics, DEFAULT_MAX_DAILY_RISK};
use crate::domain::entities::trade::Trade;
use crate::domain::values::risk_level::RiskLevel;
use crate::domain::values::trade_direction::TradeDirection;
use serde::{Deserialize, Serialize};

/// Utilization above this percentage is critical.
pub const UTILIZATION_CRITICAL_PCT: f64 = 80.0;
/// Utilization above this percentage is a warning.
pub const UTILIZATION_WARNING_PCT: f64 = 50.0;

/// User-set risk limits.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RiskLimits {
    /// Ceiling on summed open stop distance, in account currency.
    #[serde(default = "default_max_daily_risk")]
    pub max_daily_risk: f64,
    /// Alert once today's realized loss exceeds this amount.
    #[serde(default = "default_daily_loss_alert")]
    pub daily_loss_alert: f64,
}

fn default_max_daily_risk() -> f64 {
    DEFAULT_MAX_DAILY_RISK
}
fn default_daily_loss_alert() -> f64 {
    500.0
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            max_daily_risk: DEFAULT_MAX_DAILY_RISK,
            daily_loss_alert: 500.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionRisk {
    pub trade_id: String,
    pub symbol: String,
    pub direction: TradeDirection,
    pub entry_price: f64,
    pub stop_loss: Option<f64>,
    pub quantity: f64,
    /// Zero when there is no stop. Read together with `has_stop`.
    pub risk_amount: f64,
    pub has_stop: bool,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UtilizationStatus {
    Normal,
    Warning,
    Critical,
}

impl UtilizationStatus {
    pub fn from_pct(pct: f64) -> Self {
        if pct > UTILIZATION_CRITICAL_PCT {
            UtilizationStatus::Critical
        } else if pct > UTILIZATION_WARNING_PCT {
            UtilizationStatus::Warning
        } else {
            UtilizationStatus::Normal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskAlert {
    pub severity: AlertSeverity,
    pub kind: String,
    pub title: String,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskReport {
    pub positions: Vec<PositionRisk>,
    pub open_positions: usize,
    pub positions_with_stop: usize,
    /// Percentage of open positions with a stop; 100 when flat.
    pub stop_loss_compliance: f64,
    pub daily_risk_used: f64,
    pub max_daily_risk: f64,
    /// Unclamped percentage of the daily budget in use.
    pub utilization: f64,
    pub utilization_status: UtilizationStatus,
    pub max_drawdown: f64,
    pub alerts: Vec<RiskAlert>,
}

impl RiskReport {
    /// Utilization clamped to `0..=100` for progress bars.
    pub fn utilization_bar(&self) -> f64 {
        self.utilization.clamp(0.0, 100.0)
    }
}

/// Planned risk and reward for a prospective entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskReward {
    pub risk: f64,
    pub reward: f64,
    /// Reward per unit of risk; zero when risk is zero.
    pub ratio: f64,
}

pub fn position_risk(trade: &Trade) -> PositionRisk {
    let has_stop = trade.stop_loss.is_some();
    let risk_amount = trade.stop_risk().unwrap_or(0.0);
    PositionRisk {
        trade_id: trade.id.clone(),
        symbol: trade.symbol.clone(),
        direction: trade.direction,
        entry_price: trade.entry_price,
        stop_loss: trade.stop_loss,
        quantity: trade.quantity,
        risk_amount,
        has_stop,
        risk_level: RiskLevel::classify(risk_amount, has_stop),
    }
}

/// Share of open trades carrying a stop, as a percentage. Vacuously 100 with
/// no open trades.
pub fn stop_loss_compliance(trades: &[Trade]) -> f64 {
    let (open, with_stop) = trades
        .iter()
        .filter(|t| t.is_open())
        .fold((0usize, 0usize), |(open, with_stop), t| {
            (open + 1, with_stop + usize::from(t.stop_loss.is_some()))
        });
    if open == 0 {
        return 100.0;
    }
    with_stop as f64 / open as f64 * 100.0
}

pub fn utilization(daily_risk_used: f64, max_daily_risk: f64) -> f64 {
    if max_daily_risk > 0.0 {
        daily_risk_used / max_daily_risk * 100.0
    } else {
        0.0
    }
}

pub fn planned_risk_reward(
    entry_price: f64,
    quantity: f64,
    stop_loss: Option<f64>,
    take_profit: Option<f64>,
) -> RiskReward {
    let risk = stop_loss
        .map(|stop| (entry_price - stop).abs() * quantity)
        .unwrap_or(0.0);
    let reward = take_profit
        .map(|target| (target - entry_price).abs() * quantity)
        .unwrap_or(0.0);
    let ratio = if risk > 0.0 { reward / risk } else { 0.0 };
    RiskReward { risk, reward, ratio }
}

/// Builds the exposure report for the open book. `metrics` must come from the
/// same trades.
pub fn assess_exposure(
    trades: &[Trade],
    metrics: &RiskMetrics,
    limits: &RiskLimits,
) -> RiskReport {
    let positions: Vec<PositionRisk> = trades
        .iter()
        .filter(|t| t.is_open())
        .map(position_risk)
        .collect();
    let open_positions = positions.len();
    let positions_with_stop = positions.iter().filter(|p| p.has_stop).count();
    let utilization = utilization(metrics.daily_risk_used, metrics.max_daily_risk);
    let utilization_status = UtilizationStatus::from_pct(utilization);

    let mut alerts = Vec::new();
    match utilization_status {
        UtilizationStatus::Critical => alerts.push(RiskAlert {
            severity: AlertSeverity::Critical,
            kind: "daily_risk_limit".into(),
            title: "Risk Limit Warning".into(),
            detail: format!(
                "You've used {:.1}% of your maximum daily risk. \
                 Consider closing positions or avoiding new trades.",
                utilization
            ),
        }),
        UtilizationStatus::Warning => alerts.push(RiskAlert {
            severity: AlertSeverity::Warning,
            kind: "daily_risk_elevated".into(),
            title: "Elevated Daily Risk".into(),
            detail: format!("You've used {:.1}% of your maximum daily risk.", utilization),
        }),
        UtilizationStatus::Normal => {}
    }

    let missing_stops = open_positions - positions_with_stop;
    if missing_stops > 0 {
        alerts.push(RiskAlert {
            severity: AlertSeverity::Warning,
            kind: "missing_stop_loss".into(),
            title: "Missing Stop Losses".into(),
            detail: format!(
                "{} open position(s) without stop loss. Always protect your capital!",
                missing_stops
            ),
        });
    }

    if metrics.daily_pnl < -limits.daily_loss_alert {
        alerts.push(RiskAlert {
            severity: AlertSeverity::Warning,
            kind: "daily_loss".into(),
            title: "Daily Loss Alert".into(),
            detail: format!(
                "You're down ${:.2} today. Consider taking a break and reviewing your strategy.",
                metrics.daily_pnl.abs()
            ),
        });
    }

    alerts.sort_by_key(|a| match a.severity {
        AlertSeverity::Critical => 0,
        AlertSeverity::Warning => 1,
        AlertSeverity::Info => 2,
    });

    RiskReport {
        positions,
        open_positions,
        positions_with_stop,
        stop_loss_compliance: stop_loss_compliance(trades),
        daily_risk_used: metrics.daily_risk_used,
        max_daily_risk: metrics.max_daily_risk,
        utilization,
        utilization_status,
        max_drawdown: metrics.max_drawdown,
        alerts,
    }
}
