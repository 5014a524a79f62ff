//! Product catalogs.
//!
//! Base prices come from two places: static in-process tables (memberships and OTT subscriptions, compiled in
//! as configuration data) and the external game-catalog service (dynamic game products, reached through the
//! [`crate::traits::ProductCatalog`] trait).
//!
//! The static tables are data, not code: the resolver never branches on individual product slugs, it only asks
//! the catalog. Swapping the tables for a database-backed source later does not touch the pricing logic.

use std::collections::HashMap;

use gts_common::Price;
use serde::{Deserialize, Serialize};

/// Items of this game are restricted at both browse time and checkout time: the weekly pass and anything above
/// the price cap are not orderable. The filter must be identical in both places or users could browse items
/// they cannot buy (or vice versa).
pub const RESTRICTED_GAME_NAME: &str = "MLBB SMALL/PHP";
pub const RESTRICTED_ITEM_NAME: &str = "Weekly Pass";
pub const RESTRICTED_PRICE_CAP: i64 = 170;

//--------------------------------------     CatalogItem    ----------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub item_name: String,
    pub item_slug: String,
    pub selling_price: Price,
    pub available: bool,
}

//--------------------------------------      GameInfo      ----------------------------------------------------------
/// A product (static or dynamic) with its orderable item list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    pub game_slug: String,
    pub game_name: String,
    pub items: Vec<CatalogItem>,
}

impl GameInfo {
    /// Drops items excluded by the restriction rule. Applied to every dynamic item list before it is either
    /// shown to a user or priced for checkout.
    pub fn retain_orderable(&mut self) {
        if self.game_name != RESTRICTED_GAME_NAME {
            return;
        }
        self.items
            .retain(|i| i.item_name != RESTRICTED_ITEM_NAME && i.selling_price.value() <= RESTRICTED_PRICE_CAP);
    }

    pub fn item(&self, item_slug: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|i| i.item_slug == item_slug)
    }
}

//--------------------------------------   Static catalogs  ----------------------------------------------------------
type StaticTable = &'static [(&'static str, &'static str, &'static [(&'static str, &'static str, i64)])];

// (game slug, display name, [(item slug, item name, price)])
const MEMBERSHIP_TABLE: StaticTable = &[
    ("silver-membership", "Silver Membership", &[("silver-1m", "1 Month", 99), ("silver-3m", "3 Months", 299)]),
    ("reseller-membership", "Reseller Membership", &[
        ("reseller-1m", "1 Month", 199),
        ("reseller-3m", "3 Months", 699),
    ]),
];

const OTT_TABLE: StaticTable = &[
    ("youtube-premium", "YouTube Premium", &[("yt-1m", "1 Month", 129), ("yt-3m", "3 Months", 349)]),
    ("netflix", "Netflix", &[("nf-1m", "1 Month", 199), ("nf-3m", "3 Months", 549)]),
    ("instagram", "Instagram Services", &[("ig-1k", "1K Followers", 299), ("ig-5k", "5K Followers", 1299)]),
];

/// The compiled-in membership and OTT catalogs. Static products have no role sensitivity, need no network
/// call, and are available to unauthenticated callers.
#[derive(Debug, Clone)]
pub struct StaticCatalogs {
    products: HashMap<&'static str, GameInfo>,
}

impl Default for StaticCatalogs {
    fn default() -> Self {
        Self::bundled()
    }
}

impl StaticCatalogs {
    pub fn bundled() -> Self {
        let products = MEMBERSHIP_TABLE
            .iter()
            .chain(OTT_TABLE.iter())
            .map(|(slug, name, items)| {
                let items = items
                    .iter()
                    .map(|(item_slug, item_name, price)| CatalogItem {
                        item_name: item_name.to_string(),
                        item_slug: item_slug.to_string(),
                        selling_price: Price::from(*price),
                        available: true,
                    })
                    .collect();
                (*slug, GameInfo { game_slug: slug.to_string(), game_name: name.to_string(), items })
            })
            .collect();
        Self { products }
    }

    /// Returns the static product for `game_slug`, or `None` if the slug belongs to the dynamic game catalog.
    pub fn product(&self, game_slug: &str) -> Option<&GameInfo> {
        self.products.get(game_slug)
    }

    /// Fixed price lookup for a static product. Returns `None` when the item slug is absent from the product's
    /// item map; callers must treat that as an invalid-item failure, never as a zero price.
    pub fn price_of(&self, game_slug: &str, item_slug: &str) -> Option<Price> {
        self.product(game_slug)?.item(item_slug).map(|i| i.selling_price)
    }
}
