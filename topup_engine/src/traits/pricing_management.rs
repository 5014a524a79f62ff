use crate::db_types::{PricingConfig, Role};

/// Storage behaviour required by the pricing resolver and the pricing admin endpoints.
///
/// Pricing records are read by many concurrent price resolutions and written rarely; reads take no locks and
/// writes replace the slab and override lists wholesale.
#[allow(async_fn_in_trait)]
pub trait PricingManagement {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches the pricing record stored for the given role, if any. Callers are expected to normalize the
    /// role first (see [`Role::pricing_role`]).
    async fn fetch_pricing_config(&self, role: Role) -> Result<Option<PricingConfig>, Self::Error>;

    /// Creates or replaces the pricing record for `config.user_type` (upsert, last-writer-wins).
    async fn upsert_pricing_config(&self, config: PricingConfig) -> Result<PricingConfig, Self::Error>;
}
