use thiserror::Error;

use crate::{db_types::OrderId, traits::UpstreamApiError};

#[derive(Debug, Error)]
pub enum PricingApiError {
    /// The product belongs to a static catalog but the item slug is absent from its item map.
    #[error("Invalid item '{item_slug}' for product '{game_slug}'")]
    InvalidItem { game_slug: String, item_slug: String },
    /// The external catalog knows no such game, or the game has no such item.
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error(transparent)]
    Upstream(#[from] UpstreamApiError),
}

#[derive(Debug, Error)]
pub enum OrderFlowError {
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),
    /// The order has an owning user and the caller is not them.
    #[error("Forbidden")]
    Forbidden,
    /// Gateway initiation was declined or unreachable. The order named here persists in `pending` state with
    /// no gateway order id; it is retryable and inspectable, not failed.
    #[error("Payment gateway initiation failed for {order_id}: {reason}")]
    PaymentInitFailed { order_id: OrderId, reason: String },
    #[error("Payment gateway error: {0}")]
    Gateway(String),
    #[error("Fulfillment API error: {0}")]
    Fulfillment(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error(transparent)]
    Pricing(#[from] PricingApiError),
}
