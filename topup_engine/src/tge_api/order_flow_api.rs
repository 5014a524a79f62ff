use std::fmt::Debug;

use chrono::Utc;
use log::*;
use serde_json::Value;

use crate::{
    db_types::{NewOrder, Order, OrderId, OrderStatus, OrderUpdate, PaymentStatus, TopupStatus},
    tge_api::errors::OrderFlowError,
    traits::{OrderManagement, PaymentGateway, TopupOutcome, TopupProvider, TopupRequest, TxnStatus},
};

/// What a successful checkout hands back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub order_id: OrderId,
    pub payment_url: String,
}

/// The result of one verification pass over an order. Every variant is a legitimate business outcome; errors
/// (unknown order, forbidden caller, unreachable store) surface as [`OrderFlowError`] instead.
#[derive(Debug, Clone)]
pub enum VerifyOutcome {
    /// The order already reached `status = success` earlier; the cached fulfillment response is returned and
    /// neither the gateway nor the fulfillment API is contacted.
    AlreadyProcessed { topup_response: Option<Value> },
    /// The expiry window elapsed before payment; the order is now terminally failed.
    Expired,
    /// The gateway has not settled the payment yet. Nothing is persisted; the caller may verify again.
    PaymentPending,
    /// The gateway reported a non-success settlement; the order is now terminally failed.
    PaymentFailed,
    /// The settled amount differs from the frozen order price; the order is flagged as fraud and fulfillment
    /// is never dispatched.
    AmountMismatch,
    /// Another verification already completed fulfillment; the cached response is returned without re-calling
    /// the fulfillment API.
    TopupAlreadyCompleted { topup_response: Option<Value> },
    /// Fulfillment dispatched and succeeded.
    ToppedUp { topup_response: Value },
    /// Fulfillment dispatched and failed; the order is terminally failed pending manual reconciliation.
    TopupFailed { topup_response: Value },
}

/// `OrderFlowApi` is the primary API for the order lifecycle: creation with gateway initiation, and the
/// payment-verification pipeline with idempotent fulfillment dispatch.
pub struct OrderFlowApi<B, G, F> {
    db: B,
    gateway: G,
    fulfillment: F,
}

impl<B, G, F> Debug for OrderFlowApi<B, G, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B, G, F> OrderFlowApi<B, G, F>
where
    B: OrderManagement,
    G: PaymentGateway,
    F: TopupProvider,
{
    pub fn new(db: B, gateway: G, fulfillment: F) -> Self {
        Self { db, gateway, fulfillment }
    }

    /// Creates a new pending order and opens a payment session at the gateway.
    ///
    /// The price on `order` must already be the trusted server-resolved price. Order creation and gateway
    /// initiation are two steps: if initiation fails, the persisted order stays `pending` with
    /// `gateway_order_id = NULL` and the failure is surfaced to the caller. The order is never marked failed
    /// on that path; it remains inspectable and the user can start a fresh checkout.
    pub async fn create_order(&self, order: NewOrder) -> Result<CheckoutSummary, OrderFlowError> {
        let order_id = order.order_id.clone();
        self.db.insert_order(order.clone()).await.map_err(db_error)?;
        debug!("🛒️ Order [{order_id}] persisted as pending, amount {}", order.price);

        if let Some(user_id) = &order.user_id {
            // Attribution only; a failed bump must not abort the checkout.
            if let Err(e) = self.db.increment_user_order_count(user_id).await {
                warn!("🛒️ Could not bump order count for user {user_id}: {e}");
            }
        }

        let session = match self.gateway.initiate_payment(&order).await {
            Ok(session) => session,
            Err(e) => {
                warn!("🛒️ Gateway initiation failed for [{order_id}]: {e}. Order stays pending.");
                return Err(OrderFlowError::PaymentInitFailed { order_id, reason: e.to_string() });
            },
        };
        self.db
            .update_order(&order_id, OrderUpdate::default().with_gateway_order_id(session.gateway_order_id.clone()))
            .await
            .map_err(db_error)?;
        info!("🛒️ Order [{order_id}] initiated at gateway as {}", session.gateway_order_id);
        Ok(CheckoutSummary { order_id, payment_url: session.payment_url })
    }

    /// Runs one verification pass: expiry check → gateway poll → strict amount check → idempotent fulfillment
    /// dispatch. Each step gates the next; the pipeline is deliberately sequential.
    ///
    /// `caller` is the authenticated user id, if any. Orders owned by a user may only be verified by that
    /// user; guest orders (`user_id = NULL`) may be verified by anyone holding the order id.
    pub async fn verify_order(
        &self,
        order_id: &OrderId,
        caller: Option<&str>,
    ) -> Result<VerifyOutcome, OrderFlowError> {
        let order = self
            .db
            .fetch_order_by_order_id(order_id)
            .await
            .map_err(db_error)?
            .ok_or_else(|| OrderFlowError::OrderNotFound(order_id.clone()))?;

        if let Some(owner) = &order.user_id {
            if caller != Some(owner.as_str()) {
                warn!("🔍️ Verification of [{order_id}] rejected: caller is not the owning user");
                return Err(OrderFlowError::Forbidden);
            }
        }

        if order.status == OrderStatus::Success {
            trace!("🔍️ [{order_id}] already processed; returning cached fulfillment response");
            return Ok(VerifyOutcome::AlreadyProcessed { topup_response: order.external_response });
        }

        if order.is_expired_at(Utc::now()) {
            info!("🔍️ [{order_id}] expired before payment; marking failed");
            let update =
                OrderUpdate::default().with_status(OrderStatus::Failed).with_payment_status(PaymentStatus::Failed);
            self.db.update_order(order_id, update).await.map_err(db_error)?;
            return Ok(VerifyOutcome::Expired);
        }

        let poll =
            self.gateway.check_payment_status(order_id).await.map_err(|e| OrderFlowError::Gateway(e.to_string()))?;
        match poll.status {
            TxnStatus::Pending => {
                trace!("🔍️ [{order_id}] still pending at the gateway");
                return Ok(VerifyOutcome::PaymentPending);
            },
            TxnStatus::Failed => {
                info!("🔍️ [{order_id}] payment failed at the gateway");
                let update = OrderUpdate::default()
                    .with_status(OrderStatus::Failed)
                    .with_payment_status(PaymentStatus::Failed)
                    .with_gateway_response(poll.raw);
                self.db.update_order(order_id, update).await.map_err(db_error)?;
                return Ok(VerifyOutcome::PaymentFailed);
            },
            TxnStatus::Success => {},
        }

        // Strict equality, no tolerance band. A missing amount is as suspect as a wrong one.
        if poll.paid_amount != Some(order.price) {
            warn!(
                "🚨️ [{order_id}] amount mismatch: gateway settled {:?}, order price {}. Flagging as fraud.",
                poll.paid_amount, order.price
            );
            let update = OrderUpdate::default()
                .with_status(OrderStatus::Fraud)
                .with_payment_status(PaymentStatus::Failed)
                .with_topup_status(TopupStatus::Failed)
                .with_gateway_response(poll.raw);
            self.db.update_order(order_id, update).await.map_err(db_error)?;
            return Ok(VerifyOutcome::AmountMismatch);
        }

        let update =
            OrderUpdate::default().with_payment_status(PaymentStatus::Success).with_gateway_response(poll.raw);
        self.db.update_order(order_id, update).await.map_err(db_error)?;
        debug!("🔍️ [{order_id}] payment confirmed for {}", order.price);

        // Conditional claim: only one verification call may dispatch fulfillment. Losing the claim means a
        // concurrent or earlier call already completed it.
        if !self.db.claim_topup_dispatch(order_id).await.map_err(db_error)? {
            let fresh = self.db.fetch_order_by_order_id(order_id).await.map_err(db_error)?;
            trace!("🔍️ [{order_id}] top-up already completed; returning cached response");
            return Ok(VerifyOutcome::TopupAlreadyCompleted {
                topup_response: fresh.and_then(|o| o.external_response),
            });
        }

        self.dispatch_topup(&order).await
    }

    async fn dispatch_topup(&self, order: &Order) -> Result<VerifyOutcome, OrderFlowError> {
        let order_id = &order.order_id;
        let request = TopupRequest {
            player_id: order.player_id.clone(),
            zone_id: order.zone_id.clone(),
            product_id: order.product_id(),
            currency: gts_common::SETTLEMENT_CURRENCY_CODE.to_string(),
        };
        let TopupOutcome { success, raw } = match self.fulfillment.dispatch_topup(request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                // The claim was taken but nothing was dispatched; re-open the order so a later verification
                // can retry, and record the failure.
                error!("📦️ Fulfillment API unreachable for [{order_id}]: {e}");
                let update = OrderUpdate::default()
                    .with_status(OrderStatus::Failed)
                    .with_topup_status(TopupStatus::Failed);
                self.db.update_order(order_id, update).await.map_err(db_error)?;
                return Err(OrderFlowError::Fulfillment(e.to_string()));
            },
        };

        let update = if success {
            info!("📦️ [{order_id}] top-up fulfilled");
            OrderUpdate::default()
                .with_status(OrderStatus::Success)
                .with_topup_status(TopupStatus::Success)
                .with_external_response(raw.clone())
        } else {
            warn!("📦️ [{order_id}] top-up failed; order requires manual reconciliation");
            OrderUpdate::default()
                .with_status(OrderStatus::Failed)
                .with_topup_status(TopupStatus::Failed)
                .with_external_response(raw.clone())
        };
        self.db.update_order(order_id, update).await.map_err(db_error)?;

        if success {
            Ok(VerifyOutcome::ToppedUp { topup_response: raw })
        } else {
            Ok(VerifyOutcome::TopupFailed { topup_response: raw })
        }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

fn db_error<E: std::error::Error>(e: E) -> OrderFlowError {
    OrderFlowError::DatabaseError(e.to_string())
}
