use gts_common::Price;
use serde_json::Value;
use thiserror::Error;

use crate::{
    catalog::GameInfo,
    db_types::{NewOrder, OrderId},
};

#[derive(Debug, Error)]
pub enum UpstreamApiError {
    #[error("Request to upstream service failed: {0}")]
    RequestFailed(String),
    #[error("Upstream service returned an unusable response: {0}")]
    InvalidResponse(String),
    #[error("Upstream service declined the request: {0}")]
    Declined(String),
}

//--------------------------------------   Payment gateway  ----------------------------------------------------------
/// A hosted payment session opened at the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSession {
    pub gateway_order_id: String,
    pub payment_url: String,
}

/// The gateway's view of a transaction. Anything that is neither pending nor settled counts as failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnStatus {
    Pending,
    Success,
    Failed,
}

impl TxnStatus {
    /// Maps the gateway's transaction-status code. `SUCCESS` and `COMPLETED` both mean settled; a missing or
    /// unknown code is a failure, never a success.
    pub fn from_gateway_code(code: Option<&str>) -> Self {
        match code {
            Some("PENDING") => TxnStatus::Pending,
            Some("SUCCESS") | Some("COMPLETED") => TxnStatus::Success,
            _ => TxnStatus::Failed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GatewayPollResult {
    pub status: TxnStatus,
    /// The settled amount, if the gateway reported one in any of its known field spellings.
    pub paid_amount: Option<Price>,
    /// The verbatim gateway response, stored on the order for auditing.
    pub raw: Value,
}

#[allow(async_fn_in_trait)]
pub trait PaymentGateway {
    /// Opens a payment session for the given order, charging its frozen price. A declined initiation must
    /// surface as an error; the local order stays pending with no gateway order id.
    async fn initiate_payment(&self, order: &NewOrder) -> Result<PaymentSession, UpstreamApiError>;

    /// Polls the gateway for the settlement status of the given order.
    async fn check_payment_status(&self, order_id: &OrderId) -> Result<GatewayPollResult, UpstreamApiError>;
}

//--------------------------------------     Fulfillment    ----------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopupRequest {
    pub player_id: String,
    pub zone_id: String,
    /// `<game_slug>_<item_slug>`.
    pub product_id: String,
    /// Always the fixed settlement currency, independent of the order's display currency.
    pub currency: String,
}

#[derive(Debug, Clone)]
pub struct TopupOutcome {
    pub success: bool,
    /// The verbatim fulfillment response, stored on the order whatever the outcome.
    pub raw: Value,
}

#[allow(async_fn_in_trait)]
pub trait TopupProvider {
    /// Dispatches a top-up order to the fulfillment API. Called at most once per verification; the engine's
    /// claim guard prevents concurrent duplicate dispatches.
    async fn dispatch_topup(&self, request: TopupRequest) -> Result<TopupOutcome, UpstreamApiError>;
}

//--------------------------------------    Game catalog    ----------------------------------------------------------
#[allow(async_fn_in_trait)]
pub trait ProductCatalog {
    /// Fetches a dynamic game and its item list from the external catalog service. `Ok(None)` means the
    /// service knows no such game.
    async fn fetch_game(&self, game_slug: &str) -> Result<Option<GameInfo>, UpstreamApiError>;
}
