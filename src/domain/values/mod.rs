pub mod broker;
pub mod emotional_state;
pub mod instrument_type;
pub mod risk_level;
pub mod setup_quality;
pub mod trade_direction;
pub mod trade_status;
