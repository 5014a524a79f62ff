//! Adapters that plug the upstream HTTP clients into the engine's service traits.
//!
//! The client crates know nothing about the engine; these wrappers translate data objects and error types in
//! both directions so that the engine can be tested against mocks and run against the real services.

use gts_common::Price;
use supplier_tools::{SupplierApi, SupplierApiError, SupplierTopupOrder};
use topup_engine::{
    catalog::{CatalogItem, GameInfo},
    db_types::NewOrder,
    traits::{
        GatewayPollResult,
        PaymentGateway,
        PaymentSession,
        ProductCatalog,
        TopupOutcome,
        TopupProvider,
        TopupRequest,
        TxnStatus,
        UpstreamApiError,
    },
};
use xtra_tools::{XtraApiError, XtraPayApi};

//--------------------------------------   Payment gateway   ---------------------------------------------------------
#[derive(Clone)]
pub struct XtraGateway {
    api: XtraPayApi,
}

impl XtraGateway {
    pub fn new(api: XtraPayApi) -> Self {
        Self { api }
    }
}

impl PaymentGateway for XtraGateway {
    async fn initiate_payment(&self, order: &NewOrder) -> Result<PaymentSession, UpstreamApiError> {
        let session = self
            .api
            .create_payment(order.order_id.as_str(), order.price.value(), order.phone.as_deref())
            .await
            .map_err(gateway_error)?;
        Ok(PaymentSession { gateway_order_id: session.order_id, payment_url: session.payment_url })
    }

    async fn check_payment_status(
        &self,
        order_id: &topup_engine::db_types::OrderId,
    ) -> Result<GatewayPollResult, UpstreamApiError> {
        let snapshot = self.api.check_order_status(order_id.as_str()).await.map_err(gateway_error)?;
        let status = TxnStatus::from_gateway_code(snapshot.txn_status.as_deref());
        // A fractional settled amount can never equal a whole-unit order price, so it decays to `None` here
        // and trips the mismatch check downstream.
        let paid_amount = snapshot.amount.and_then(|a| Price::try_from(a).ok());
        Ok(GatewayPollResult { status, paid_amount, raw: snapshot.raw })
    }
}

fn gateway_error(e: XtraApiError) -> UpstreamApiError {
    match e {
        XtraApiError::Declined(m) => UpstreamApiError::Declined(m),
        XtraApiError::JsonError(m) => UpstreamApiError::InvalidResponse(m),
        XtraApiError::ResponseError(m) => UpstreamApiError::InvalidResponse(m),
        XtraApiError::QueryError { status, message } => {
            UpstreamApiError::RequestFailed(format!("HTTP {status}: {message}"))
        },
        XtraApiError::Initialization(m) => UpstreamApiError::RequestFailed(m),
    }
}

//--------------------------------------  Supplier services  ---------------------------------------------------------
/// One supplier backs both the dynamic game catalog and top-up fulfillment.
#[derive(Clone)]
pub struct SupplierIntegration {
    api: SupplierApi,
}

impl SupplierIntegration {
    pub fn new(api: SupplierApi) -> Self {
        Self { api }
    }
}

impl TopupProvider for SupplierIntegration {
    async fn dispatch_topup(&self, request: TopupRequest) -> Result<TopupOutcome, UpstreamApiError> {
        let order = SupplierTopupOrder {
            player_id: request.player_id,
            zone_id: request.zone_id,
            product_id: request.product_id,
            currency: request.currency,
        };
        let result = self.api.create_topup(&order).await.map_err(supplier_error)?;
        Ok(TopupOutcome { success: result.success, raw: result.raw })
    }
}

impl ProductCatalog for SupplierIntegration {
    async fn fetch_game(&self, game_slug: &str) -> Result<Option<GameInfo>, UpstreamApiError> {
        let Some(game) = self.api.fetch_game(game_slug).await.map_err(supplier_error)? else {
            return Ok(None);
        };
        let items = game
            .items
            .into_iter()
            .map(|i| CatalogItem {
                item_name: i.item_name,
                item_slug: i.item_slug,
                // Base prices are whole units; the rare fractional one is rounded up, never down.
                selling_price: Price::from(i.selling_price.ceil() as i64),
                available: i.available,
            })
            .collect();
        Ok(Some(GameInfo { game_slug: game.game_slug, game_name: game.game_name, items }))
    }
}

fn supplier_error(e: SupplierApiError) -> UpstreamApiError {
    match e {
        SupplierApiError::JsonError(m) => UpstreamApiError::InvalidResponse(m),
        SupplierApiError::ResponseError(m) => UpstreamApiError::InvalidResponse(m),
        SupplierApiError::QueryError { status, message } => {
            UpstreamApiError::RequestFailed(format!("HTTP {status}: {message}"))
        },
        SupplierApiError::Initialization(m) => UpstreamApiError::RequestFailed(m),
    }
}
