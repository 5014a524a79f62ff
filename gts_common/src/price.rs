use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Sub},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

/// The currency customers are charged in.
pub const DEFAULT_CURRENCY_CODE: &str = "INR";
/// The currency the supplier settles top-ups in, independent of the order's display currency.
pub const SETTLEMENT_CURRENCY_CODE: &str = "USD";

//--------------------------------------       Price       -----------------------------------------------------------
/// A charge-able amount in whole currency units. Prices are always integers; fractional results of markup
/// calculations are rounded **up** before a `Price` is constructed (see [`Price::from_marked_up`]).
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Price(i64);

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a price: {0}")]
pub struct PriceConversionError(String);

impl From<i64> for Price {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Price {}

impl TryFrom<u64> for Price {
    type Error = PriceConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(PriceConversionError(format!("Value {} is too large to convert to Price", value)))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl TryFrom<f64> for Price {
    type Error = PriceConversionError;

    /// Converts an upstream-reported amount into a `Price`, rejecting NaN, infinities and fractional values.
    /// Gateways report settled amounts; a fractional settled amount can never equal an integer order price,
    /// so it is treated as unrepresentable rather than rounded.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value.fract() != 0.0 || value.abs() > i64::MAX as f64 {
            Err(PriceConversionError(format!("{value} is not a whole, representable amount")))
        } else {
            #[allow(clippy::cast_possible_truncation)]
            Ok(Self(value as i64))
        }
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "₹{}", self.0)
    }
}

impl Price {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Applies a percentage markup to this price and rounds the result up to the nearest whole unit.
    pub fn with_markup_percent(&self, percent: f64) -> Self {
        // Computed as base + base*percent/100 rather than base*(1 + percent/100); the latter picks up float
        // error on exact cases (100 * 1.12 = 112.000…01, which would ceil to 113).
        let base = self.0 as f64;
        Self::from_marked_up(base + base * percent / 100.0)
    }

    /// Ceiling-rounds a fractional amount into a whole-unit price.
    pub fn from_marked_up(amount: f64) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        Self(amount.ceil() as i64)
    }
}
