use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use gts_common::Price;
use log::error;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Invalid value: {0}")]
pub struct ConversionError(String);

//--------------------------------------        Role        ----------------------------------------------------------
/// The caller's privilege tier. Roles form a strict order: `User < Member < Admin < Owner`.
///
/// What each role may do is expressed here as capability methods rather than string comparisons at call sites,
/// so "who may view/write pricing" is one declarative policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Member,
    Admin,
    Owner,
}

impl Role {
    /// Members inherit the admin pricing record; there is no separate "member" config.
    pub fn pricing_role(self) -> Role {
        match self {
            Role::Member => Role::Admin,
            r => r,
        }
    }

    /// Owners always pay the catalog base price; no markup is ever applied to them.
    pub fn pays_base_price(self) -> bool {
        self == Role::Owner
    }

    pub fn can_view_pricing(self) -> bool {
        self >= Role::Member
    }

    pub fn can_write_pricing(self) -> bool {
        self == Role::Owner
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Member => write!(f, "member"),
            Role::Admin => write!(f, "admin"),
            Role::Owner => write!(f, "owner"),
        }
    }
}

impl FromStr for Role {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "member" => Ok(Role::Member),
            "admin" => Ok(Role::Admin),
            "owner" => Ok(Role::Owner),
            s => Err(ConversionError(format!("Invalid role: {s}"))),
        }
    }
}

//--------------------------------------       OrderId      ----------------------------------------------------------
/// The system-assigned order identifier (`TOPUP_<base36 millis>_<16 hex chars>`).
///
/// It is immutable once assigned and unique across all orders. For guest orders the identifier doubles as a
/// secondary access credential, so its random component must remain unguessable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------    Status triple   ----------------------------------------------------------
/// Overall order outcome. Terminal values are `Success`, `Failed` and `Fraud`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Success,
    Failed,
    /// The gateway settled an amount that differs from the frozen order price. Flagged for manual review and
    /// never conflated with an ordinary payment failure.
    Fraud,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopupStatus {
    #[default]
    Pending,
    Success,
    Failed,
}

macro_rules! status_strings {
    ($name:ident => $($variant:ident : $repr:literal),+) => {
        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $($name::$variant => write!(f, $repr),)+
                }
            }
        }

        impl FromStr for $name {
            type Err = ConversionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($repr => Ok($name::$variant),)+
                    s => Err(ConversionError(format!("Invalid {}: {s}", stringify!($name)))),
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                value.parse().unwrap_or_else(|_| {
                    error!("Invalid {} in storage: {value}. Defaulting to Pending.", stringify!($name));
                    $name::Pending
                })
            }
        }
    };
}

status_strings!(OrderStatus => Pending: "pending", Success: "success", Failed: "failed", Fraud: "fraud");
status_strings!(PaymentStatus => Pending: "pending", Success: "success", Failed: "failed");
status_strings!(TopupStatus => Pending: "pending", Success: "success", Failed: "failed");

//--------------------------------------        Order       ----------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_id: OrderId,
    /// Assigned by the payment gateway. Stays `None` until gateway initiation succeeds.
    pub gateway_order_id: Option<String>,
    /// `None` for guest orders.
    pub user_id: Option<String>,
    pub game_slug: String,
    pub item_slug: String,
    pub item_name: String,
    pub player_id: String,
    pub zone_id: String,
    pub payment_method: String,
    /// Server-computed at creation time and never recomputed. Verification compares the gateway-settled
    /// amount against this frozen value.
    pub price: Price,
    pub currency: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub topup_status: TopupStatus,
    /// Last raw gateway poll result, kept verbatim for auditing.
    pub gateway_response: Option<Value>,
    /// Last raw fulfillment-API result, kept verbatim for auditing.
    pub external_response: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Order {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// The composed product id sent to the fulfillment API.
    pub fn product_id(&self) -> String {
        format!("{}_{}", self.game_slug, self.item_slug)
    }
}

//--------------------------------------      NewOrder      ----------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_id: OrderId,
    pub user_id: Option<String>,
    pub game_slug: String,
    pub item_slug: String,
    pub item_name: String,
    pub player_id: String,
    pub zone_id: String,
    pub payment_method: String,
    pub price: Price,
    pub currency: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub expires_at: DateTime<Utc>,
}

//--------------------------------------     OrderUpdate    ----------------------------------------------------------
/// The subset of order fields that may change after creation. Everything else is frozen at creation time.
#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub topup_status: Option<TopupStatus>,
    pub gateway_order_id: Option<String>,
    pub gateway_response: Option<Value>,
    pub external_response: Option<Value>,
}

impl OrderUpdate {
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_payment_status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = Some(status);
        self
    }

    pub fn with_topup_status(mut self, status: TopupStatus) -> Self {
        self.topup_status = Some(status);
        self
    }

    pub fn with_gateway_order_id<S: Into<String>>(mut self, id: S) -> Self {
        self.gateway_order_id = Some(id.into());
        self
    }

    pub fn with_gateway_response(mut self, response: Value) -> Self {
        self.gateway_response = Some(response);
        self
    }

    pub fn with_external_response(mut self, response: Value) -> Self {
        self.external_response = Some(response);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() &&
            self.payment_status.is_none() &&
            self.topup_status.is_none() &&
            self.gateway_order_id.is_none() &&
            self.gateway_response.is_none() &&
            self.external_response.is_none()
    }
}

//--------------------------------------    PricingConfig   ----------------------------------------------------------
/// A price-range markup rule. The range is half-open: a slab matches when `min <= base_price < max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slab {
    pub min: i64,
    pub max: i64,
    pub percent: f64,
}

impl Slab {
    pub fn contains(&self, price: Price) -> bool {
        let v = price.value();
        self.min <= v && v < self.max
    }
}

/// A per-item fixed final price that bypasses slab markup entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceOverride {
    pub game_slug: String,
    pub item_slug: String,
    pub fixed_price: i64,
}

/// One markup configuration per role. Only the admin record is ever written; members read it via
/// [`Role::pricing_role`]. Writes replace `slabs` and `overrides` wholesale (last-writer-wins).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfig {
    pub user_type: Role,
    #[serde(default)]
    pub slabs: Vec<Slab>,
    #[serde(default)]
    pub overrides: Vec<PriceOverride>,
}

impl PricingConfig {
    pub fn for_role(role: Role) -> Self {
        Self { user_type: role, ..Default::default() }
    }

    pub fn override_for(&self, game_slug: &str, item_slug: &str) -> Option<&PriceOverride> {
        self.overrides.iter().find(|o| o.game_slug == game_slug && o.item_slug == item_slug)
    }

    pub fn slab_for(&self, base_price: Price) -> Option<&Slab> {
        self.slabs.iter().find(|s| s.contains(base_price))
    }
}
