//! Traits the engine sees the outside world through.
//!
//! Storage ([`OrderManagement`], [`PricingManagement`]) and the three upstream HTTP services
//! ([`PaymentGateway`], [`TopupProvider`], [`ProductCatalog`]) are all abstracted here so the order flow and
//! pricing APIs can run against test doubles.

mod order_management;
mod pricing_management;
mod upstream;

pub use order_management::OrderManagement;
pub use pricing_management::PricingManagement;
pub use upstream::{
    GatewayPollResult,
    PaymentGateway,
    PaymentSession,
    ProductCatalog,
    TopupOutcome,
    TopupProvider,
    TopupRequest,
    TxnStatus,
    UpstreamApiError,
};
