//! Top-up Engine
//!
//! The engine contains the core logic of the game top-up store: price resolution, order lifecycle management,
//! payment verification and fulfillment dispatch. It is HTTP-framework agnostic and provider-agnostic.
//!
//! The library is divided into three main sections:
//! 1. Database types and storage traits ([`db_types`], [`traits`]). SQLite is the bundled backend; you should
//!    never need to touch the database directly. Use the public APIs instead.
//! 2. Upstream service traits ([`traits`]): the payment gateway, the product catalog and the top-up provider are
//!    external HTTP services. The engine only sees them through small traits so that the order flow can be
//!    exercised against test doubles.
//! 3. The engine public API ([`tge_api`]): [`OrderFlowApi`] drives order creation and the verification pipeline,
//!    [`PricingApi`] resolves role-adjusted prices from the static and dynamic catalogs.

pub mod catalog;
pub mod db_types;
pub mod helpers;
pub mod traits;

mod tge_api;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use tge_api::{
    errors::{OrderFlowError, PricingApiError},
    order_flow_api::{CheckoutSummary, OrderFlowApi, VerifyOutcome},
    pricing_api::PricingApi,
};
