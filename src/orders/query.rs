use std::sync::Arc;

use super::error::OrderError;
use super::store::OrderStore;
use super::types::{Order, TraderId};

/// Resolves a trader id to that trader's order collection.
#[derive(Clone)]
pub struct QueryHandler {
    store: Arc<dyn OrderStore>,
}

impl QueryHandler {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    pub async fn orders(&self, trader_id: &TraderId) -> Result<Vec<Order>, OrderError> {
        match self.store.orders_for(trader_id).await {
            Some(orders) => {
                tracing::debug!("Resolved {} orders for trader {}", orders.len(), trader_id);
                Ok(orders)
            }
            None => {
                tracing::debug!("Lookup for unknown trader {}", trader_id);
                Err(OrderError::UnknownTrader(trader_id.clone()))
            }
        }
    }

    /// Serializes the trader's orders as a JSON array, one object per order.
    ///
    /// An empty collection yields `[]`.
    pub async fn handle_query(&self, trader_id: &TraderId) -> Result<String, OrderError> {
        let orders = self.orders(trader_id).await?;
        Ok(serde_json::to_string(&orders)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::store::{InMemoryOrderStore, MockOrderStore};
    use crate::orders::types::{NewOrder, Side};
    use tokio_test::{assert_err, assert_ok};

    fn trader(id: &str) -> TraderId {
        TraderId::new(id).unwrap()
    }

    fn new_order() -> NewOrder {
        NewOrder {
            instrument: "XBTUSDTM".to_string(),
            side: Side::Buy,
            quantity: 1.0,
            price: 42000.0,
            client_oid: None,
        }
    }

    async fn two_trader_store() -> Arc<InMemoryOrderStore> {
        let store = Arc::new(InMemoryOrderStore::default());
        store.register_trader(trader("T1")).await.unwrap();
        store.register_trader(trader("T2")).await.unwrap();
        store.submit_order(&trader("T1"), new_order()).await.unwrap();
        store.submit_order(&trader("T2"), new_order()).await.unwrap();
        store.submit_order(&trader("T2"), new_order()).await.unwrap();
        store
    }

    fn ids(payload: &str) -> Vec<u64> {
        let value: serde_json::Value = serde_json::from_str(payload).unwrap();
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|order| order["id"].as_u64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_query_returns_trader_orders() {
        let handler = QueryHandler::new(two_trader_store().await);

        let payload = assert_ok!(handler.handle_query(&trader("T2")).await);
        assert_eq!(ids(&payload), vec![2, 3]);

        let payload = assert_ok!(handler.handle_query(&trader("T1")).await);
        assert_eq!(ids(&payload), vec![1]);
    }

    #[tokio::test]
    async fn test_payload_length_matches_collection() {
        let store = two_trader_store().await;
        let handler = QueryHandler::new(store.clone());

        for id in store.trader_ids().await {
            let payload = handler.handle_query(&id).await.unwrap();
            let expected = store.orders_for(&id).await.unwrap();
            let decoded: Vec<Order> = serde_json::from_str(&payload).unwrap();
            assert_eq!(decoded, expected);
        }
    }

    #[tokio::test]
    async fn test_query_is_idempotent() {
        let handler = QueryHandler::new(two_trader_store().await);
        let first = handler.handle_query(&trader("T2")).await.unwrap();
        let second = handler.handle_query(&trader("T2")).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unknown_trader() {
        let handler = QueryHandler::new(two_trader_store().await);
        let err = assert_err!(handler.handle_query(&trader("T3")).await);
        assert!(matches!(err, OrderError::UnknownTrader(id) if id == trader("T3")));
    }

    #[tokio::test]
    async fn test_empty_store() {
        let handler = QueryHandler::new(Arc::new(InMemoryOrderStore::default()));
        let err = assert_err!(handler.handle_query(&trader("T1")).await);
        assert!(matches!(err, OrderError::UnknownTrader(_)));
    }

    #[tokio::test]
    async fn test_empty_collection_is_not_an_error() {
        let store = Arc::new(InMemoryOrderStore::default());
        store.register_trader(trader("T1")).await.unwrap();

        let handler = QueryHandler::new(store);
        let payload = assert_ok!(handler.handle_query(&trader("T1")).await);
        assert_eq!(payload, "[]");
    }

    #[tokio::test]
    async fn test_lookup_goes_through_store_by_key() {
        let mut store = MockOrderStore::new();
        store
            .expect_orders_for()
            .withf(|id| id.as_str() == "T1")
            .times(1)
            .returning(|_| Some(Vec::new()));
        store.expect_trader_ids().never();

        let handler = QueryHandler::new(Arc::new(store));
        assert_eq!(handler.handle_query(&trader("T1")).await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_missing_collection_from_store() {
        let mut store = MockOrderStore::new();
        store.expect_orders_for().returning(|_| None);

        let handler = QueryHandler::new(Arc::new(store));
        assert_err!(handler.orders(&trader("T1")).await);
    }
}
