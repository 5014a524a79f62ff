//! `SqliteDatabase` is the concrete storage backend: it implements [`OrderManagement`] and
//! [`PricingManagement`] over a SQLite connection pool.

use std::fmt::Debug;

use sqlx::SqlitePool;

use super::db::{new_pool, orders, pricing, SqliteDatabaseError};
use crate::{
    db_types::{NewOrder, Order, OrderId, OrderUpdate, PricingConfig, Role},
    traits::{OrderManagement, PricingManagement},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Connects to the database at `url`, running any pending migrations.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl OrderManagement for SqliteDatabase {
    type Error = SqliteDatabaseError;

    async fn insert_order(&self, order: NewOrder) -> Result<Order, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        orders::insert_order(order, &mut conn).await
    }

    async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order_by_order_id(order_id, &mut conn).await
    }

    async fn update_order(&self, order_id: &OrderId, update: OrderUpdate) -> Result<(), Self::Error> {
        let mut conn = self.pool.acquire().await?;
        orders::update_order(order_id, update, &mut conn).await
    }

    async fn claim_topup_dispatch(&self, order_id: &OrderId) -> Result<bool, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        orders::claim_topup_dispatch(order_id, &mut conn).await
    }

    async fn increment_user_order_count(&self, user_id: &str) -> Result<(), Self::Error> {
        let mut conn = self.pool.acquire().await?;
        orders::increment_user_order_count(user_id, &mut conn).await
    }
}

impl PricingManagement for SqliteDatabase {
    type Error = SqliteDatabaseError;

    async fn fetch_pricing_config(&self, role: Role) -> Result<Option<PricingConfig>, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        pricing::fetch_pricing_config(role, &mut conn).await
    }

    async fn upsert_pricing_config(&self, config: PricingConfig) -> Result<PricingConfig, Self::Error> {
        let mut conn = self.pool.acquire().await?;
        pricing::upsert_pricing_config(config, &mut conn).await
    }
}
