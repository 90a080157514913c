use thiserror::Error;

use super::types::TraderId;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("unknown trader: {0}")]
    UnknownTrader(TraderId),

    #[error("trader already registered: {0}")]
    DuplicateTrader(TraderId),

    #[error("invalid trader id: {0}")]
    InvalidTraderId(String),

    #[error("invalid order: {0}")]
    InvalidOrder(String),

    #[error("failed to serialize orders: {0}")]
    Serialization(#[from] serde_json::Error),
}
