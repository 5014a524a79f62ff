use gts_common::extract::{bool_at, string_at};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One purchasable denomination of a game, as the supplier reports it. Unknown fields (images, dummy prices,
/// sort indices) are dropped on deserialization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SupplierItem {
    #[serde(rename = "itemName")]
    pub item_name: String,
    #[serde(rename = "itemSlug")]
    pub item_slug: String,
    /// The supplier occasionally reports fractional base prices, and sometimes numbers as strings.
    #[serde(rename = "sellingPrice", deserialize_with = "number_or_numeric_string")]
    pub selling_price: f64,
    // The misspelling is the supplier's, not ours.
    #[serde(rename = "itemAvailablity", default = "default_true")]
    pub available: bool,
}

fn default_true() -> bool {
    true
}

fn number_or_numeric_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().ok_or_else(|| de::Error::custom("price out of range")),
        Value::String(s) => s.trim().parse::<f64>().map_err(de::Error::custom),
        other => Err(de::Error::custom(format!("expected a price, got {other}"))),
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SupplierGame {
    #[serde(rename = "gameSlug")]
    pub game_slug: String,
    #[serde(rename = "gameName")]
    pub game_name: String,
    #[serde(rename = "itemId", default)]
    pub items: Vec<SupplierItem>,
}

/// The JSON body of a top-up dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierTopupOrder {
    pub player_id: String,
    pub zone_id: String,
    pub product_id: String,
    pub currency: String,
}

/// The outcome of a top-up dispatch. The supplier signals success through any of three fields depending on
/// the product line, so the flag is computed once here and the raw body kept for the order record.
#[derive(Debug, Clone)]
pub struct TopupResult {
    pub success: bool,
    pub raw: Value,
}

impl TopupResult {
    pub fn from_response(http_ok: bool, raw: Value) -> Self {
        let success = http_ok &&
            (bool_at(&raw, "success") == Some(true) ||
                bool_at(&raw, "status") == Some(true) ||
                string_at(&raw, "result.status") == Some("SUCCESS"));
        Self { success, raw }
    }
}
