//! # Top-up store server
//!
//! The HTTP face of the game top-up store. It is responsible for:
//! * authenticating callers from the storefront's JWTs,
//! * resolving trusted server-side prices at checkout,
//! * creating orders and opening payment sessions at the gateway,
//! * driving the payment-verification and fulfillment pipeline,
//! * serving the role-priced catalog and the pricing admin endpoints.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.

pub mod auth;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
