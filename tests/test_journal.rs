mod common;

use common::{make_trade, setup};
use tradejournal::application::journal::{RiskEdit, TradeFilter};
use tradejournal::domain::entities::strategy::NewStrategy;
use tradejournal::domain::entities::trade::TradeExit;
use tradejournal::domain::error::DomainError;
use tradejournal::domain::values::instrument_type::InstrumentType;
use tradejournal::domain::values::trade_direction::TradeDirection;
use tradejournal::domain::values::trade_status::TradeStatus;

#[test]
fn test_add_and_list_trade() {
    let journal = setup();
    let trade = journal
        .add_trade(make_trade("aapl", TradeDirection::Long, 150.0, 10.0, Some(145.0)))
        .unwrap();

    assert_eq!(trade.symbol, "AAPL");
    assert_eq!(trade.status, TradeStatus::Open);

    let trades = journal.trades(&TradeFilter::default()).unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].id, trade.id);
}

#[test]
fn test_newest_trade_first() {
    let journal = setup();
    journal
        .add_trade(make_trade("AAA", TradeDirection::Long, 10.0, 1.0, None))
        .unwrap();
    journal
        .add_trade(make_trade("BBB", TradeDirection::Long, 10.0, 1.0, None))
        .unwrap();

    let trades = journal.trades(&TradeFilter::default()).unwrap();
    assert_eq!(trades[0].symbol, "BBB");
    assert_eq!(trades[1].symbol, "AAA");

    let limited = journal
        .trades(&TradeFilter {
            limit: Some(1),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].symbol, "BBB");
}

#[test]
fn test_invalid_trade_rejected() {
    let journal = setup();
    let mut input = make_trade("", TradeDirection::Long, 0.0, 10.0, None);
    input.thesis = "  ".into();
    let err = journal.add_trade(input).unwrap_err();
    match err {
        DomainError::InvalidInput(msg) => {
            assert!(msg.contains("Symbol is required"));
            assert!(msg.contains("Valid entry price is required"));
            assert!(msg.contains("Trade thesis is required"));
        }
        other => panic!("expected InvalidInput, got {other:?}"),
    }
    assert!(journal.trades(&TradeFilter::default()).unwrap().is_empty());
}

#[test]
fn test_close_long_trade() {
    let journal = setup();
    let trade = journal
        .add_trade(make_trade("AAPL", TradeDirection::Long, 100.0, 10.0, Some(95.0)))
        .unwrap();
    let closed = journal
        .close_trade(
            &trade.id,
            TradeExit {
                exit_price: 110.0,
                exit_reason: Some("Target hit".into()),
                lessons_learned: Some("  ".into()),
                mistakes: vec!["Sized too small".into(), " ".into()],
            },
        )
        .unwrap();

    assert_eq!(closed.status, TradeStatus::Closed);
    assert_eq!(closed.realized_pnl, Some(100.0));
    assert!(closed.exit_time.is_some());
    assert_eq!(closed.exit_reason.as_deref(), Some("Target hit"));
    assert!(closed.lessons_learned.is_none());
    assert_eq!(closed.mistakes, vec!["Sized too small".to_string()]);
}

#[test]
fn test_close_short_trade() {
    let journal = setup();
    let trade = journal
        .add_trade(make_trade("ES", TradeDirection::Short, 100.0, 5.0, None))
        .unwrap();
    let closed = journal
        .close_trade(
            &trade.id,
            TradeExit {
                exit_price: 90.0,
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(closed.realized_pnl, Some(50.0));
}

#[test]
fn test_close_unknown_trade() {
    let journal = setup();
    let err = journal
        .close_trade(
            "nope",
            TradeExit {
                exit_price: 1.0,
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[test]
fn test_update_risk_and_delete() {
    let journal = setup();
    let trade = journal
        .add_trade(make_trade("NVDA", TradeDirection::Long, 50.0, 20.0, None))
        .unwrap();
    let updated = journal
        .update_risk(&trade.id, RiskEdit::default().set_stop(45.0).set_target(65.0))
        .unwrap();
    assert_eq!(updated.stop_loss, Some(45.0));
    assert_eq!(updated.take_profit, Some(65.0));

    assert!(journal
        .update_risk(&trade.id, RiskEdit::default().set_stop(-1.0))
        .is_err());

    journal.delete_trade(&trade.id).unwrap();
    assert!(matches!(
        journal.trade(&trade.id),
        Err(DomainError::NotFound(_))
    ));
    assert!(matches!(
        journal.delete_trade(&trade.id),
        Err(DomainError::NotFound(_))
    ));
}

#[test]
fn test_default_strategies_seeded() {
    let journal = setup();
    let strategies = journal.strategies().unwrap();
    let names: Vec<&str> = strategies.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Momentum Breakout", "Mean Reversion"]);
    assert!(strategies.iter().all(|s| s.active));
}

#[test]
fn test_strategy_lifecycle() {
    let journal = setup();
    let strategy = journal
        .add_strategy(NewStrategy {
            name: "Gap Fill".into(),
            description: "Fade opening gaps".into(),
            rules: vec!["Gap > 2%".into(), "".into(), " No news ".into()],
            timeframe: "5min".into(),
            instruments: vec![InstrumentType::Stocks, InstrumentType::Stocks],
        })
        .unwrap();
    assert_eq!(strategy.rules, vec!["Gap > 2%".to_string(), "No news".to_string()]);
    assert_eq!(strategy.instruments, vec![InstrumentType::Stocks]);
    assert_eq!(journal.strategies().unwrap().len(), 3);

    let inactive = journal.set_strategy_active(&strategy.id, false).unwrap();
    assert!(!inactive.active);

    let renamed = journal
        .update_strategy(
            &strategy.id,
            NewStrategy {
                name: "Gap Fade".into(),
                description: "Fade opening gaps".into(),
                rules: vec!["Gap > 3%".into()],
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(renamed.id, strategy.id);
    assert!(!renamed.active);

    journal.delete_strategy(&strategy.id).unwrap();
    assert_eq!(journal.strategies().unwrap().len(), 2);
}

#[test]
fn test_strategy_requires_rule() {
    let journal = setup();
    let err = journal
        .add_strategy(NewStrategy {
            name: "Empty".into(),
            description: "No rules".into(),
            rules: vec!["   ".into()],
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));
}

#[test]
fn test_deleting_strategy_keeps_trades() {
    let journal = setup();
    journal
        .add_trade(make_trade("AAPL", TradeDirection::Long, 10.0, 1.0, None))
        .unwrap();
    journal.delete_strategy("1").unwrap();

    let trades = journal
        .trades(&TradeFilter {
            strategy: Some("Momentum Breakout".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(trades.len(), 1);
}

#[test]
fn test_moving_stop_keeps_target() {
    let journal = setup();
    let mut input = make_trade("MSFT", TradeDirection::Long, 100.0, 10.0, Some(95.0));
    input.take_profit = Some(120.0);
    let trade = journal.add_trade(input).unwrap();

    journal
        .update_risk(&trade.id, RiskEdit::default().set_stop(97.0))
        .unwrap();
    let stored = journal.trade(&trade.id).unwrap();
    assert_eq!(stored.stop_loss, Some(97.0));
    assert_eq!(stored.take_profit, Some(120.0));

    journal
        .update_risk(&trade.id, RiskEdit::default().clear_stop())
        .unwrap();
    let stored = journal.trade(&trade.id).unwrap();
    assert_eq!(stored.stop_loss, None);
    assert_eq!(stored.take_profit, Some(120.0));
}

#[test]
fn test_rename_cannot_duplicate_strategy() {
    let journal = setup();
    let err = journal
        .update_strategy(
            "2",
            NewStrategy {
                name: "Momentum Breakout".into(),
                description: "Same name as the first default".into(),
                rules: vec!["Anything".into()],
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));

    let names: Vec<String> = journal
        .strategies()
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["Momentum Breakout", "Mean Reversion"]);
}
