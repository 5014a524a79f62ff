mod price;

pub mod extract;
mod secret;

pub use price::{Price, PriceConversionError, DEFAULT_CURRENCY_CODE, SETTLEMENT_CURRENCY_CODE};
pub use secret::Secret;
