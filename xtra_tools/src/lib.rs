//! A thin client for the XtraGateway hosted-payment API.
//!
//! The gateway speaks form-encoded requests and JSON responses with a loose schema, so the client keeps the
//! verbatim response around and only lifts out the handful of fields the store acts on.

mod api;
mod config;
mod data_objects;
mod error;

pub use api::XtraPayApi;
pub use config::XtraConfig;
pub use data_objects::{NewPaymentSession, OrderStatusSnapshot};
pub use error::XtraApiError;
