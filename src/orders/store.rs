use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::sync::RwLock;

use super::error::OrderError;
use super::types::{NewOrder, Order, TraderId};

/// Access to the per-trader order collections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Registered trader ids, in ascending order.
    async fn trader_ids(&self) -> Vec<TraderId>;

    /// The trader's orders in submission order, or `None` if the trader is unknown.
    async fn orders_for(&self, trader_id: &TraderId) -> Option<Vec<Order>>;

    /// Every order in the store, ordered by id.
    async fn all_orders(&self) -> Vec<Order>;

    async fn register_trader(&self, trader_id: TraderId) -> Result<(), OrderError>;

    async fn submit_order(
        &self,
        trader_id: &TraderId,
        new_order: NewOrder,
    ) -> Result<Order, OrderError>;
}

struct StoreState {
    orders: BTreeMap<TraderId, Vec<Order>>,
    next_id: u64,
}

pub struct InMemoryOrderStore {
    state: RwLock<StoreState>,
    auto_register: bool,
}

impl InMemoryOrderStore {
    pub fn new(auto_register: bool) -> Self {
        Self {
            state: RwLock::new(StoreState {
                orders: BTreeMap::new(),
                next_id: 1,
            }),
            auto_register,
        }
    }

    /// Loads a JSON object mapping trader ids to lists of orders.
    ///
    /// Every key is registered, including traders with no orders. Traders are
    /// loaded in ascending id order and each trader's orders in file order, so
    /// ids follow that sequence. A trader listed twice keeps only its last entry.
    pub async fn from_seed_file(path: impl AsRef<Path>, auto_register: bool) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read order seed file {}", path.display()))?;
        let seed: BTreeMap<String, Vec<NewOrder>> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse order seed file {}", path.display()))?;

        let store = Self::new(auto_register);
        store.load_seed(seed).await?;

        tracing::info!(
            "📂 Loaded order seed from {} ({} traders)",
            path.display(),
            store.trader_ids().await.len()
        );

        Ok(store)
    }

    pub async fn load_seed(&self, seed: BTreeMap<String, Vec<NewOrder>>) -> Result<()> {
        for (raw_id, orders) in seed {
            let trader_id = TraderId::new(raw_id)?;
            self.register_trader(trader_id.clone()).await?;
            for new_order in orders {
                self.submit_order(&trader_id, new_order)
                    .await
                    .with_context(|| format!("invalid seed order for trader {}", trader_id))?;
            }
        }
        Ok(())
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new(false)
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn trader_ids(&self) -> Vec<TraderId> {
        self.state.read().await.orders.keys().cloned().collect()
    }

    async fn orders_for(&self, trader_id: &TraderId) -> Option<Vec<Order>> {
        self.state.read().await.orders.get(trader_id).cloned()
    }

    async fn all_orders(&self) -> Vec<Order> {
        let state = self.state.read().await;
        let mut orders: Vec<Order> = state.orders.values().flatten().cloned().collect();
        orders.sort_by_key(|order| order.id);
        orders
    }

    async fn register_trader(&self, trader_id: TraderId) -> Result<(), OrderError> {
        let mut state = self.state.write().await;
        if state.orders.contains_key(&trader_id) {
            return Err(OrderError::DuplicateTrader(trader_id));
        }

        tracing::info!("👤 Registered trader {}", trader_id);
        state.orders.insert(trader_id, Vec::new());
        Ok(())
    }

    async fn submit_order(
        &self,
        trader_id: &TraderId,
        new_order: NewOrder,
    ) -> Result<Order, OrderError> {
        let mut state = self.state.write().await;

        let known = state.orders.contains_key(trader_id);
        if !known && !self.auto_register {
            return Err(OrderError::UnknownTrader(trader_id.clone()));
        }

        let order = Order::new(state.next_id, trader_id.clone(), new_order)?;
        state.next_id += 1;

        if !known {
            tracing::info!("👤 Auto-registered trader {}", trader_id);
        }

        tracing::info!(
            "📥 Order {} accepted: {} {} {} @ {:.2} (notional {:.2}) for {}",
            order.id,
            order.side,
            order.quantity,
            order.instrument,
            order.price,
            order.notional(),
            trader_id
        );

        state
            .orders
            .entry(trader_id.clone())
            .or_default()
            .push(order.clone());

        Ok(order)
    }
}
