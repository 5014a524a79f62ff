use std::fmt::Debug;

use gts_common::Price;
use log::*;

use crate::{
    catalog::{GameInfo, StaticCatalogs},
    db_types::{PricingConfig, Role},
    tge_api::errors::PricingApiError,
    traits::{PricingManagement, ProductCatalog},
};

/// `PricingApi` computes the final charge-able price for any product and the role-priced catalog views shown
/// at browse time. It is a pure read path: the only side effect is the catalog fetch for dynamic games.
pub struct PricingApi<B, C> {
    db: B,
    catalog: C,
    statics: StaticCatalogs,
}

impl<B, C> Debug for PricingApi<B, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PricingApi")
    }
}

impl<B, C> PricingApi<B, C>
where
    B: PricingManagement,
    C: ProductCatalog,
{
    pub fn new(db: B, catalog: C) -> Self {
        Self { db, catalog, statics: StaticCatalogs::bundled() }
    }

    /// Resolves the trusted server-side price for one item.
    ///
    /// Static catalog products carry fixed prices for every caller. Dynamic game products start from the
    /// external catalog's base price and receive exactly one role-based adjustment: an exact per-item override
    /// if one exists, else the first matching slab markup, else nothing. Owners always pay base price. The
    /// result is ceiling-rounded to a whole unit.
    pub async fn resolve_price(
        &self,
        game_slug: &str,
        item_slug: &str,
        role: Role,
    ) -> Result<Price, PricingApiError> {
        if let Some(product) = self.statics.product(game_slug) {
            return product.item(item_slug).map(|i| i.selling_price).ok_or_else(|| {
                PricingApiError::InvalidItem { game_slug: game_slug.to_string(), item_slug: item_slug.to_string() }
            });
        }

        let game = self
            .catalog
            .fetch_game(game_slug)
            .await?
            .ok_or_else(|| PricingApiError::ProductNotFound(game_slug.to_string()))?;
        let base_price = {
            let mut game = game;
            game.retain_orderable();
            game.item(item_slug)
                .map(|i| i.selling_price)
                .ok_or_else(|| PricingApiError::ProductNotFound(format!("{game_slug}/{item_slug}")))?
        };

        if role.pays_base_price() {
            trace!("💲️ {role} pays base price {base_price} for {game_slug}/{item_slug}");
            return Ok(base_price);
        }

        let config = self.pricing_config_for(role).await?;
        let price = apply_markup(config.as_ref(), game_slug, item_slug, base_price);
        debug!("💲️ Resolved {game_slug}/{item_slug} for {role}: base {base_price} -> {price}");
        Ok(price)
    }

    /// The role-priced, restriction-filtered view of a game used by the browse endpoint. Runs the same filter
    /// and the same markup application as [`Self::resolve_price`] so browse and checkout can never disagree.
    pub async fn game_with_pricing(&self, game_slug: &str, role: Role) -> Result<Option<GameInfo>, PricingApiError> {
        if let Some(product) = self.statics.product(game_slug) {
            return Ok(Some(product.clone()));
        }
        let Some(mut game) = self.catalog.fetch_game(game_slug).await? else {
            return Ok(None);
        };
        game.retain_orderable();
        if !role.pays_base_price() {
            if let Some(config) = self.pricing_config_for(role).await? {
                for item in &mut game.items {
                    item.selling_price = apply_markup(Some(&config), game_slug, &item.item_slug, item.selling_price);
                }
            }
        }
        Ok(Some(game))
    }

    /// The slab/override view for the pricing admin screen. Roles without a stored record see empty lists.
    pub async fn pricing_for_role(&self, role: Role) -> Result<PricingConfig, PricingApiError> {
        let role = role.pricing_role();
        let config = self.pricing_config_for(role).await?;
        Ok(config.unwrap_or_else(|| PricingConfig::for_role(role)))
    }

    /// Replaces the stored pricing record. Authorization and entry validation happen at the HTTP boundary;
    /// this is a plain last-writer-wins upsert.
    pub async fn save_pricing(&self, config: PricingConfig) -> Result<PricingConfig, PricingApiError> {
        info!(
            "💲️ Replacing pricing config for '{}': {} slabs, {} overrides",
            config.user_type,
            config.slabs.len(),
            config.overrides.len()
        );
        self.db.upsert_pricing_config(config).await.map_err(|e| PricingApiError::DatabaseError(e.to_string()))
    }

    async fn pricing_config_for(&self, role: Role) -> Result<Option<PricingConfig>, PricingApiError> {
        self.db
            .fetch_pricing_config(role.pricing_role())
            .await
            .map_err(|e| PricingApiError::DatabaseError(e.to_string()))
    }
}

/// Applies exactly one adjustment, in priority order: exact override, else first matching slab, else none.
/// The returned price is always whole-unit (slab markups are ceiling-rounded).
fn apply_markup(config: Option<&PricingConfig>, game_slug: &str, item_slug: &str, base_price: Price) -> Price {
    let Some(config) = config else {
        return base_price;
    };
    if let Some(o) = config.override_for(game_slug, item_slug) {
        return Price::from(o.fixed_price);
    }
    match config.slab_for(base_price) {
        Some(slab) => base_price.with_markup_percent(slab.percent),
        None => base_price,
    }
}
