use gts_common::extract::{first_number, string_at};
use serde_json::Value;

/// Candidate field names for the settled amount, in the order the gateway has been observed to use them.
pub const AMOUNT_PATHS: [&str; 3] = ["result.amount", "result.txnAmount", "result.orderAmount"];

/// A hosted payment session opened by a create-order call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPaymentSession {
    /// The gateway's own identifier for the session.
    pub order_id: String,
    /// Where to send the customer to complete payment.
    pub payment_url: String,
}

/// One status poll, as reported by the gateway. `raw` is the verbatim response body; callers store it for
/// auditing and apply their own policy to the lifted fields.
#[derive(Debug, Clone)]
pub struct OrderStatusSnapshot {
    pub txn_status: Option<String>,
    pub amount: Option<f64>,
    pub raw: Value,
}

impl OrderStatusSnapshot {
    pub fn from_response(raw: Value) -> Self {
        let txn_status = string_at(&raw, "result.txnStatus").map(|s| s.to_string());
        let amount = first_number(&raw, &AMOUNT_PATHS);
        Self { txn_status, amount, raw }
    }
}
