use sqlx::{Row, SqliteConnection};

use crate::{
    db_types::{PricingConfig, Role},
    sqlite::db::SqliteDatabaseError,
};

pub async fn fetch_pricing_config(
    role: Role,
    conn: &mut SqliteConnection,
) -> Result<Option<PricingConfig>, SqliteDatabaseError> {
    let row = sqlx::query("SELECT slabs, overrides FROM pricing_configs WHERE user_type = $1")
        .bind(role.to_string())
        .fetch_optional(conn)
        .await?;
    let Some(row) = row else {
        return Ok(None);
    };
    let slabs = serde_json::from_str(&row.try_get::<String, _>("slabs")?)?;
    let overrides = serde_json::from_str(&row.try_get::<String, _>("overrides")?)?;
    Ok(Some(PricingConfig { user_type: role, slabs, overrides }))
}

/// Creates or replaces the pricing record for the config's role. The slab and override lists are stored as
/// JSON and replaced wholesale; there is no merge.
pub async fn upsert_pricing_config(
    config: PricingConfig,
    conn: &mut SqliteConnection,
) -> Result<PricingConfig, SqliteDatabaseError> {
    let slabs = serde_json::to_string(&config.slabs)?;
    let overrides = serde_json::to_string(&config.overrides)?;
    sqlx::query(
        r#"
            INSERT INTO pricing_configs (user_type, slabs, overrides) VALUES ($1, $2, $3)
            ON CONFLICT(user_type) DO UPDATE SET
                slabs = excluded.slabs,
                overrides = excluded.overrides,
                updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(config.user_type.to_string())
    .bind(slabs)
    .bind(overrides)
    .execute(conn)
    .await?;
    Ok(config)
}
