use std::convert::Infallible;
use warp::hyper::StatusCode;
use warp::reply::{json, with_status, Json, WithStatus};
use warp::{Rejection, Reply};

use super::types::ErrorBody;
use crate::orders::OrderError;

pub type ApiReply = WithStatus<Json>;

pub fn error(error_type: &str, description: impl AsRef<str>) -> Json {
    json(&ErrorBody {
        error_type: error_type.to_string(),
        description: description.as_ref().to_string(),
    })
}

pub trait IntoWarpReply {
    fn into_warp_reply(self) -> ApiReply;
}

impl IntoWarpReply for OrderError {
    fn into_warp_reply(self) -> ApiReply {
        match self {
            Self::UnknownTrader(_) => {
                with_status(error("UnknownTrader", self.to_string()), StatusCode::NOT_FOUND)
            }
            Self::DuplicateTrader(_) => {
                with_status(error("DuplicateTrader", self.to_string()), StatusCode::CONFLICT)
            }
            Self::InvalidTraderId(_) => {
                with_status(error("InvalidTraderId", self.to_string()), StatusCode::BAD_REQUEST)
            }
            Self::InvalidOrder(_) => {
                with_status(error("InvalidOrder", self.to_string()), StatusCode::BAD_REQUEST)
            }
            Self::Serialization(err) => {
                tracing::error!(?err, "failed to serialize response");
                with_status(
                    error("InternalServerError", ""),
                    StatusCode::INTERNAL_SERVER_ERROR,
                )
            }
        }
    }
}

/// Turns warp rejections into JSON error bodies.
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let reply = if err.is_not_found() {
        with_status(error("NotFound", "no such route"), StatusCode::NOT_FOUND)
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        with_status(error("InvalidBody", e.to_string()), StatusCode::BAD_REQUEST)
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        with_status(
            error("PayloadTooLarge", "request body too large"),
            StatusCode::PAYLOAD_TOO_LARGE,
        )
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        with_status(
            error("UnsupportedMediaType", "expected application/json"),
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        with_status(
            error("MethodNotAllowed", "method not allowed"),
            StatusCode::METHOD_NOT_ALLOWED,
        )
    } else {
        tracing::error!(?err, "unhandled rejection");
        with_status(
            error("InternalServerError", ""),
            StatusCode::INTERNAL_SERVER_ERROR,
        )
    };
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::TraderId;

    fn status_of(err: OrderError) -> StatusCode {
        err.into_warp_reply().into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        let id = TraderId::new("T1").unwrap();
        assert_eq!(status_of(OrderError::UnknownTrader(id.clone())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(OrderError::DuplicateTrader(id)), StatusCode::CONFLICT);
        assert_eq!(
            status_of(OrderError::InvalidTraderId("".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(OrderError::InvalidOrder("price".to_string())),
            StatusCode::BAD_REQUEST
        );

        let serde_err = serde_json::from_str::<u64>("x").unwrap_err();
        assert_eq!(
            status_of(OrderError::Serialization(serde_err)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
