//! Grouped performance breakdowns over closed trades.
//!
//! Each breakdown is a single pass over the ledger. Open trades are skipped
//! everywhere. Grouping keeps first-seen order except where noted.

use crate::application::calendar::day_bounds;
use crate::application::metrics::OutcomeStats;
use crate::domain::entities::strategy::Strategy;
use crate::domain::entities::trade::Trade;
use crate::domain::values::instrument_type::InstrumentType;
use crate::domain::values::trade_direction::TradeDirection;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Length of the trailing daily P&L series.
pub const DAILY_SERIES_DAYS: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPnlPoint {
    pub date: NaiveDate,
    /// `MM/DD` chart label.
    pub label: String,
    pub pnl: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategySummary {
    pub strategy: String,
    pub trades: usize,
    pub total_pnl: f64,
    pub win_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OutcomeDistribution {
    pub wins: usize,
    pub losses: usize,
    pub breakeven: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentSummary {
    pub instrument: InstrumentType,
    pub trades: usize,
    pub total_pnl: f64,
}

/// Outcome counts for setup scores `floor..=floor + 1`. Breakeven trades
/// count as losses here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetupQualityBucket {
    pub floor: u8,
    pub label: String,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DirectionSplit {
    pub long: usize,
    pub short: usize,
}

/// Closed-trade results for one defined strategy, joined by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyPerformance {
    pub strategy_id: String,
    pub name: String,
    pub active: bool,
    pub trades: usize,
    pub win_rate: f64,
    pub total_pnl: f64,
    /// Mean P&L per closed trade.
    pub avg_return: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub generated_at: DateTime<Utc>,
    pub closed_trades: usize,
    pub daily_pnl: Vec<DailyPnlPoint>,
    pub by_strategy: Vec<StrategySummary>,
    pub distribution: OutcomeDistribution,
    pub by_instrument: Vec<InstrumentSummary>,
    pub setup_quality: Vec<SetupQualityBucket>,
    pub directions: DirectionSplit,
    pub avg_setup_quality: Option<f64>,
    /// Average win over average loss; `None` without losses.
    pub win_loss_ratio: Option<f64>,
    pub strategy_performance: Vec<StrategyPerformance>,
}

pub fn build_report<Tz: TimeZone>(
    trades: &[Trade],
    strategies: &[Strategy],
    now: &DateTime<Tz>,
) -> AnalyticsReport {
    let stats = OutcomeStats::from_trades(closed(trades));
    let win_loss_ratio = if stats.avg_loss() > 0.0 {
        Some(stats.avg_win() / stats.avg_loss())
    } else {
        None
    };

    AnalyticsReport {
        generated_at: now.with_timezone(&Utc),
        closed_trades: stats.trades,
        daily_pnl: daily_pnl_series(trades, now),
        by_strategy: strategy_breakdown(trades),
        distribution: outcome_distribution(trades),
        by_instrument: instrument_breakdown(trades),
        setup_quality: setup_quality_buckets(trades),
        directions: direction_split(trades),
        avg_setup_quality: average_setup_quality(trades),
        win_loss_ratio,
        strategy_performance: strategy_performance(trades, strategies),
    }
}

fn closed(trades: &[Trade]) -> impl Iterator<Item = &Trade> {
    trades.iter().filter(|t| t.is_closed())
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Realized P&L for each of the last 30 local calendar days, oldest first,
/// ending with today. Days without closes are zero.
pub fn daily_pnl_series<Tz: TimeZone>(trades: &[Trade], now: &DateTime<Tz>) -> Vec<DailyPnlPoint> {
    let tz = now.timezone();
    let today = now.date_naive();

    (0..DAILY_SERIES_DAYS as i64)
        .rev()
        .map(|days_back| {
            let date = today - Duration::days(days_back);
            let (start, end) = day_bounds(&tz, date);
            let pnl = closed(trades)
                .filter(|t| {
                    let settled = t.settled_at();
                    settled >= start && settled < end
                })
                .map(|t| t.pnl())
                .sum::<f64>();
            DailyPnlPoint {
                date,
                label: date.format("%m/%d").to_string(),
                pnl,
            }
        })
        .collect()
}

/// Groups on the strategy text exactly as recorded, so renamed or deleted
/// strategies still get their own row.
pub fn strategy_breakdown(trades: &[Trade]) -> Vec<StrategySummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, OutcomeStats)> = Vec::new();

    for trade in closed(trades) {
        let slot = *index.entry(trade.strategy.as_str()).or_insert_with(|| {
            groups.push((trade.strategy.as_str(), OutcomeStats::default()));
            groups.len() - 1
        });
        groups[slot].1.record(trade);
    }

    groups
        .into_iter()
        .map(|(name, stats)| StrategySummary {
            strategy: name.to_string(),
            trades: stats.trades,
            total_pnl: stats.total_pnl(),
            win_rate: stats.win_rate(),
        })
        .collect()
}

pub fn outcome_distribution(trades: &[Trade]) -> OutcomeDistribution {
    let mut dist = OutcomeDistribution::default();
    for trade in closed(trades) {
        let pnl = trade.pnl();
        if pnl > 0.0 {
            dist.wins += 1;
        } else if pnl < 0.0 {
            dist.losses += 1;
        } else {
            dist.breakeven += 1;
        }
    }
    dist
}

pub fn instrument_breakdown(trades: &[Trade]) -> Vec<InstrumentSummary> {
    let mut groups: Vec<InstrumentSummary> = Vec::new();
    for trade in closed(trades) {
        match groups
            .iter_mut()
            .find(|g| g.instrument == trade.instrument_type)
        {
            Some(group) => {
                group.trades += 1;
                group.total_pnl += trade.pnl();
            }
            None => groups.push(InstrumentSummary {
                instrument: trade.instrument_type,
                trades: 1,
                total_pnl: trade.pnl(),
            }),
        }
    }
    groups
}

/// Width-2 buckets sorted by floor.
pub fn setup_quality_buckets(trades: &[Trade]) -> Vec<SetupQualityBucket> {
    let mut buckets: BTreeMap<u8, (usize, usize)> = BTreeMap::new();
    for trade in closed(trades) {
        let entry = buckets
            .entry(trade.setup_quality.bucket_floor())
            .or_insert((0, 0));
        if trade.pnl() > 0.0 {
            entry.0 += 1;
        } else {
            entry.1 += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(floor, (wins, losses))| SetupQualityBucket {
            floor,
            label: format!("{}-{}", floor, floor + 1),
            wins,
            losses,
            win_rate: percentage(wins, wins + losses),
        })
        .collect()
}

pub fn direction_split(trades: &[Trade]) -> DirectionSplit {
    let mut split = DirectionSplit::default();
    for trade in closed(trades) {
        match trade.direction {
            TradeDirection::Long => split.long += 1,
            TradeDirection::Short => split.short += 1,
        }
    }
    split
}

pub fn average_setup_quality(trades: &[Trade]) -> Option<f64> {
    let (sum, count) = closed(trades).fold((0u32, 0u32), |(sum, count), t| {
        (sum + t.setup_quality.value() as u32, count + 1)
    });
    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}

/// One row per defined strategy, in definition order, including strategies
/// with no closed trades yet.
pub fn strategy_performance(trades: &[Trade], strategies: &[Strategy]) -> Vec<StrategyPerformance> {
    strategies
        .iter()
        .map(|strategy| {
            let stats =
                OutcomeStats::from_trades(closed(trades).filter(|t| t.strategy == strategy.name));
            let total_pnl = stats.total_pnl();
            StrategyPerformance {
                strategy_id: strategy.id.clone(),
                name: strategy.name.clone(),
                active: strategy.active,
                trades: stats.trades,
                win_rate: stats.win_rate(),
                total_pnl,
                avg_return: if stats.trades > 0 {
                    total_pnl / stats.trades as f64
                } else {
                    0.0
                },
            }
        })
        .collect()
}
