//! Client for the supplier that backs the dynamic game catalog and executes top-ups.
//!
//! Every request carries the shared API key in an `x-api-key` header. The supplier's responses are loosely
//! typed; the client lifts out the fields the store needs and keeps the raw body for order records.

mod api;
mod config;
mod data_objects;
mod error;

pub use api::SupplierApi;
pub use config::SupplierConfig;
pub use data_objects::{SupplierGame, SupplierItem, SupplierTopupOrder, TopupResult};
pub use error::SupplierApiError;
