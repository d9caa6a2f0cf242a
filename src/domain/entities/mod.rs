pub mod ledger;
pub mod strategy;
pub mod trade;
