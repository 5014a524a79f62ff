use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use topup_engine::db_types::{PriceOverride, Slab};

/// The checkout request body. Field presence is validated by the handler rather than the deserializer so the
/// storefront gets its expected `Missing required fields` envelope instead of a serde error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderRequest {
    #[serde(default)]
    pub game_slug: Option<String>,
    #[serde(default)]
    pub item_slug: Option<String>,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default)]
    pub zone_id: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    gts_common::DEFAULT_CURRENCY_CODE.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    #[serde(default)]
    pub order_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

/// A successful checkout: the order id to poll with and the gateway URL to send the customer to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedResponse {
    pub success: bool,
    pub order_id: String,
    pub payment_url: String,
}

/// One verification pass. `topup_response` is present whenever a fulfillment result (fresh or cached) exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topup_response: Option<Value>,
}

impl VerifyResponse {
    pub fn new<S: Display>(success: bool, message: S, topup_response: Option<Value>) -> Self {
        Self { success, message: message.to_string(), topup_response }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricingQuery {
    #[serde(rename = "userType", default)]
    pub user_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingData {
    pub slabs: Vec<Slab>,
    pub overrides: Vec<PriceOverride>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePricingRequest {
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub slabs: Vec<Slab>,
    #[serde(default)]
    pub overrides: Vec<PriceOverride>,
}

/// The `{ success, data }` envelope used by the read endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { success: true, data }
    }
}
