use percent_encoding::percent_decode_str;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::header::CONTENT_TYPE;
use warp::hyper::StatusCode;
use warp::reply::{json, with_header, with_status, Response};
use warp::{Filter, Rejection, Reply};

use super::error::IntoWarpReply;
use super::types::RegisterTraderRequest;
use super::{extract_payload, with_store};
use crate::orders::{OrderError, OrderStore, QueryHandler, TraderId};

fn with_query_handler(
    handler: QueryHandler,
) -> impl Filter<Extract = (QueryHandler,), Error = Infallible> + Clone {
    warp::any().map(move || handler.clone())
}

/// `POST /traders`: registers a trader with an empty order collection.
pub fn register_trader(
    store: Arc<dyn OrderStore>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("traders")
        .and(warp::post())
        .and(extract_payload::<RegisterTraderRequest>())
        .and(with_store(store))
        .and_then(|request: RegisterTraderRequest, store: Arc<dyn OrderStore>| async move {
            let reply = match store.register_trader(request.trader_id.clone()).await {
                Ok(()) => with_status(json(&request), StatusCode::CREATED),
                Err(err) => err.into_warp_reply(),
            };
            Result::<_, Infallible>::Ok(reply)
        })
}

/// `GET /traders/{trader_id}/orders`: the trader's orders as a JSON array.
pub fn get_trader_orders(
    handler: QueryHandler,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("traders" / String / "orders")
        .and(warp::get())
        .and(with_query_handler(handler))
        .and_then(|raw_id: String, handler: QueryHandler| async move {
            Result::<_, Infallible>::Ok(trader_orders_response(raw_id, &handler).await)
        })
}

/// Trader ids arrive percent-encoded in the path and must be decoded
/// before they can match a registered id.
fn decode_trader_id(segment: &str) -> Result<TraderId, OrderError> {
    let decoded = percent_decode_str(segment).decode_utf8().map_err(|err| {
        OrderError::InvalidTraderId(format!("{:?} is not valid UTF-8: {}", segment, err))
    })?;
    TraderId::new(decoded.into_owned())
}

async fn trader_orders_response(raw_id: String, handler: &QueryHandler) -> Response {
    let trader_id = match decode_trader_id(&raw_id) {
        Ok(id) => id,
        Err(err) => return err.into_warp_reply().into_response(),
    };

    match handler.handle_query(&trader_id).await {
        Ok(payload) => with_status(
            with_header(payload, CONTENT_TYPE, "application/json"),
            StatusCode::OK,
        )
        .into_response(),
        Err(err) => {
            tracing::debug!("Order lookup failed: {}", err);
            err.into_warp_reply().into_response()
        }
    }
}
