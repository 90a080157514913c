use serde::{Deserialize, Serialize};

use crate::orders::{NewOrder, TraderId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitOrderRequest {
    pub trader_id: TraderId,
    #[serde(flatten)]
    pub order: NewOrder,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterTraderRequest {
    pub trader_id: TraderId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error_type: String,
    pub description: String,
}
