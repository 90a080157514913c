pub mod error;
pub mod orders;
pub mod traders;
pub mod types;

pub use error::{handle_rejection, ApiReply, IntoWarpReply};
pub use types::*;

use serde::de::DeserializeOwned;
use std::convert::Infallible;
use std::sync::Arc;
use warp::hyper::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::core::HealthChecker;
use crate::monitoring::ApiMetrics;
use crate::orders::{OrderStore, QueryHandler};

const MAX_JSON_BODY_PAYLOAD: u64 = 1024 * 16;

fn extract_payload<T: DeserializeOwned + Send>(
) -> impl Filter<Extract = (T,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_JSON_BODY_PAYLOAD).and(warp::body::json())
}

fn with_store(
    store: Arc<dyn OrderStore>,
) -> impl Filter<Extract = (Arc<dyn OrderStore>,), Error = Infallible> + Clone {
    warp::any().map(move || store.clone())
}

fn health(
    health_checker: HealthChecker,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("health")
        .and(warp::get())
        .and(warp::any().map(move || health_checker.clone()))
        .and_then(|checker: HealthChecker| async move {
            let status = checker.get_status().await;
            Ok::<_, Infallible>(warp::reply::json(&status))
        })
}

fn metrics(
    metrics: ApiMetrics,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("metrics")
        .and(warp::get())
        .map(move || match metrics.export() {
            Ok(text) => warp::reply::with_status(text, StatusCode::OK),
            Err(err) => {
                tracing::error!(?err, "failed to encode metrics");
                warp::reply::with_status(String::new(), StatusCode::INTERNAL_SERVER_ERROR)
            }
        })
}

/// All service routes, with rejections rendered as JSON and every
/// request recorded in `api_metrics`.
pub fn handle_all_routes(
    store: Arc<dyn OrderStore>,
    health_checker: HealthChecker,
    api_metrics: ApiMetrics,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let query_handler = QueryHandler::new(store.clone());

    let routes = orders::get_orders(store.clone())
        .or(orders::post_order(store.clone()))
        .or(traders::register_trader(store))
        .or(traders::get_trader_orders(query_handler))
        .or(health(health_checker))
        .or(metrics(api_metrics.clone()));

    let log = warp::log::custom(move |info: warp::log::Info| {
        api_metrics.record(
            info.path(),
            info.method().as_str(),
            info.status().as_u16(),
            info.elapsed(),
        );
        tracing::debug!(
            "{} {} -> {} in {:?}",
            info.method(),
            info.path(),
            info.status(),
            info.elapsed()
        );
    });

    routes.recover(handle_rejection).with(log)
}
