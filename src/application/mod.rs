pub mod analytics;
pub mod calendar;
pub mod journal;
pub mod metrics;
pub mod risk_exposure;

#[cfg(test)]
mod test_support;
