use std::convert::Infallible;
use std::sync::Arc;
use warp::hyper::StatusCode;
use warp::reply::{json, with_status};
use warp::{Filter, Rejection, Reply};

use super::error::{ApiReply, IntoWarpReply};
use super::types::SubmitOrderRequest;
use super::{extract_payload, with_store};
use crate::orders::{Order, OrderError, OrderStore};

/// `GET /orders`: every order in the store, oldest first.
pub fn get_orders(
    store: Arc<dyn OrderStore>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("orders")
        .and(warp::get())
        .and(with_store(store))
        .and_then(|store: Arc<dyn OrderStore>| async move {
            let orders = store.all_orders().await;
            tracing::debug!("Listing {} orders", orders.len());
            Result::<_, Infallible>::Ok(with_status(json(&orders), StatusCode::OK))
        })
}

/// `POST /orders`: submits a new order for a registered trader.
pub fn post_order(
    store: Arc<dyn OrderStore>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("orders")
        .and(warp::post())
        .and(extract_payload::<SubmitOrderRequest>())
        .and(with_store(store))
        .and_then(|request: SubmitOrderRequest, store: Arc<dyn OrderStore>| async move {
            Result::<_, Infallible>::Ok(submit_order_response(
                store.submit_order(&request.trader_id, request.order).await,
            ))
        })
}

fn submit_order_response(result: Result<Order, OrderError>) -> ApiReply {
    match result {
        Ok(order) => with_status(json(&order), StatusCode::CREATED),
        Err(err) => {
            tracing::warn!("Order rejected: {}", err);
            err.into_warp_reply()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::{InMemoryOrderStore, TraderId};
    use warp::test::request;

    async fn store_with_trader() -> Arc<dyn OrderStore> {
        let store = InMemoryOrderStore::default();
        store
            .register_trader(TraderId::new("T1").unwrap())
            .await
            .unwrap();
        Arc::new(store)
    }

    fn order_body(trader: &str) -> serde_json::Value {
        serde_json::json!({
            "trader_id": trader,
            "instrument": "XBTUSDTM",
            "side": "buy",
            "quantity": 3.0,
            "price": 41000.5
        })
    }

    #[tokio::test]
    async fn test_post_then_get_orders() {
        let store = store_with_trader().await;

        let response = request()
            .method("POST")
            .path("/orders")
            .json(&order_body("T1"))
            .reply(&post_order(store.clone()))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: Order = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.trader_id.as_str(), "T1");

        let response = request()
            .method("GET")
            .path("/orders")
            .reply(&get_orders(store))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let orders: Vec<Order> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(orders, vec![created]);
    }

    #[tokio::test]
    async fn test_post_for_unknown_trader() {
        let response = request()
            .method("POST")
            .path("/orders")
            .json(&order_body("T7"))
            .reply(&post_order(store_with_trader().await))
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_post_invalid_order() {
        let mut body = order_body("T1");
        body["price"] = serde_json::json!(0.0);

        let response = request()
            .method("POST")
            .path("/orders")
            .json(&body)
            .reply(&post_order(store_with_trader().await))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(error["errorType"], "InvalidOrder");
    }

    #[tokio::test]
    async fn test_get_orders_empty_store() {
        let response = request()
            .method("GET")
            .path("/orders")
            .reply(&get_orders(Arc::new(InMemoryOrderStore::default())))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_ref(), b"[]");
    }
}
