use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::error::OrderError;

/// Key naming one trading participant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TraderId(String);

impl TraderId {
    pub fn new(id: impl Into<String>) -> Result<Self, OrderError> {
        let id = id.into();
        if id.is_empty() {
            return Err(OrderError::InvalidTraderId("trader id must not be empty".to_string()));
        }
        if id.trim() != id {
            return Err(OrderError::InvalidTraderId(format!(
                "trader id {:?} has surrounding whitespace",
                id
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TraderId {
    type Error = OrderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TraderId> for String {
    fn from(id: TraderId) -> Self {
        id.0
    }
}

impl fmt::Display for TraderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// Order payload as submitted by a client, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub instrument: String,
    pub side: Side,
    pub quantity: f64,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_oid: Option<Uuid>,
}

impl NewOrder {
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.instrument.trim().is_empty() {
            return Err(OrderError::InvalidOrder("instrument must not be empty".to_string()));
        }
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err(OrderError::InvalidOrder(format!(
                "quantity must be positive, got {}",
                self.quantity
            )));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(OrderError::InvalidOrder(format!(
                "price must be positive, got {}",
                self.price
            )));
        }
        Ok(())
    }
}

/// A validated order held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub client_oid: Uuid,
    pub trader_id: TraderId,
    pub instrument: String,
    pub side: Side,
    pub quantity: f64,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Builds an order from a submission. Fails if the submission is invalid.
    pub fn new(id: u64, trader_id: TraderId, new_order: NewOrder) -> Result<Self, OrderError> {
        new_order.validate()?;

        Ok(Self {
            id,
            client_oid: new_order.client_oid.unwrap_or_else(Uuid::new_v4),
            trader_id,
            instrument: new_order.instrument,
            side: new_order.side,
            quantity: new_order.quantity,
            price: new_order.price,
            created_at: Utc::now(),
        })
    }

    pub fn notional(&self) -> f64 {
        self.quantity * self.price
    }
}
