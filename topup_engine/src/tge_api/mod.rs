//! The engine's public API surface.
//!
//! * [`pricing_api`] resolves role-adjusted prices and role-priced catalog views.
//! * [`order_flow_api`] drives order creation, gateway initiation and the verification pipeline.

pub mod errors;
pub mod order_flow_api;
pub mod pricing_api;
