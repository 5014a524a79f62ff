use chrono::{DateTime, Utc};
use gts_common::Price;
use log::{debug, trace};
use serde_json::Value;
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, SqliteConnection};

use crate::{
    db_types::{NewOrder, Order, OrderId, OrderUpdate},
    sqlite::db::SqliteDatabaseError,
};

/// Inserts a brand-new order and returns the stored row. A duplicate order id is an error; orders are never
/// reused across checkout attempts.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, SqliteDatabaseError> {
    let result = sqlx::query(
        r#"
            INSERT INTO orders (
                order_id, user_id, game_slug, item_slug, item_name, player_id, zone_id,
                payment_method, price, currency, email, phone, expires_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#,
    )
    .bind(order.order_id.as_str())
    .bind(&order.user_id)
    .bind(&order.game_slug)
    .bind(&order.item_slug)
    .bind(&order.item_name)
    .bind(&order.player_id)
    .bind(&order.zone_id)
    .bind(&order.payment_method)
    .bind(order.price)
    .bind(&order.currency)
    .bind(&order.email)
    .bind(&order.phone)
    .bind(order.expires_at)
    .execute(&mut *conn)
    .await;
    if let Err(e) = result {
        if e.as_database_error().is_some_and(|d| d.is_unique_violation()) {
            return Err(SqliteDatabaseError::OrderAlreadyExists(order.order_id));
        }
        return Err(e.into());
    }
    fetch_order_by_order_id(&order.order_id, conn)
        .await?
        .ok_or(SqliteDatabaseError::OrderInsertMissing(order.order_id))
}

pub async fn fetch_order_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, SqliteDatabaseError> {
    let row = sqlx::query("SELECT * FROM orders WHERE order_id = $1 LIMIT 1")
        .bind(order_id.as_str())
        .fetch_optional(conn)
        .await?;
    row.map(|r| order_from_row(&r)).transpose()
}

/// Applies the mutable fields of an [`OrderUpdate`] to an order row.
pub async fn update_order(
    order_id: &OrderId,
    update: OrderUpdate,
    conn: &mut SqliteConnection,
) -> Result<(), SqliteDatabaseError> {
    if update.is_empty() {
        debug!("📝️ No fields to update for order {order_id}. Update request skipped.");
        return Ok(());
    }
    let mut builder = QueryBuilder::new("UPDATE orders SET updated_at = CURRENT_TIMESTAMP,");
    let mut set_clause = builder.separated(", ");
    if let Some(status) = update.status {
        set_clause.push("status = ");
        set_clause.push_bind_unseparated(status.to_string());
    }
    if let Some(status) = update.payment_status {
        set_clause.push("payment_status = ");
        set_clause.push_bind_unseparated(status.to_string());
    }
    if let Some(status) = update.topup_status {
        set_clause.push("topup_status = ");
        set_clause.push_bind_unseparated(status.to_string());
    }
    if let Some(gateway_order_id) = update.gateway_order_id {
        set_clause.push("gateway_order_id = ");
        set_clause.push_bind_unseparated(gateway_order_id);
    }
    if let Some(response) = update.gateway_response {
        set_clause.push("gateway_response = ");
        set_clause.push_bind_unseparated(response.to_string());
    }
    if let Some(response) = update.external_response {
        set_clause.push("external_response = ");
        set_clause.push_bind_unseparated(response.to_string());
    }
    builder.push(" WHERE order_id = ");
    builder.push_bind(order_id.as_str());
    trace!("📝️ Executing query: {}", builder.sql());
    builder.build().execute(conn).await?;
    Ok(())
}

/// The atomic fulfillment claim: transitions `topup_status` to `success` only if it is not already there, and
/// reports whether this caller won the transition. Concurrent verification calls race on this single UPDATE
/// instead of on a read-modify-write cycle.
pub async fn claim_topup_dispatch(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<bool, SqliteDatabaseError> {
    let result = sqlx::query(
        "UPDATE orders SET topup_status = 'success', updated_at = CURRENT_TIMESTAMP \
         WHERE order_id = $1 AND topup_status != 'success'",
    )
    .bind(order_id.as_str())
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn increment_user_order_count(
    user_id: &str,
    conn: &mut SqliteConnection,
) -> Result<(), SqliteDatabaseError> {
    sqlx::query("UPDATE users SET order_count = order_count + 1 WHERE user_id = $1")
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(())
}

fn order_from_row(row: &SqliteRow) -> Result<Order, SqliteDatabaseError> {
    let gateway_response = json_column(row, "gateway_response")?;
    let external_response = json_column(row, "external_response")?;
    Ok(Order {
        id: row.try_get("id")?,
        order_id: OrderId(row.try_get("order_id")?),
        gateway_order_id: row.try_get("gateway_order_id")?,
        user_id: row.try_get("user_id")?,
        game_slug: row.try_get("game_slug")?,
        item_slug: row.try_get("item_slug")?,
        item_name: row.try_get("item_name")?,
        player_id: row.try_get("player_id")?,
        zone_id: row.try_get("zone_id")?,
        payment_method: row.try_get("payment_method")?,
        price: Price::from(row.try_get::<i64, _>("price")?),
        currency: row.try_get("currency")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        status: row.try_get::<String, _>("status")?.into(),
        payment_status: row.try_get::<String, _>("payment_status")?.into(),
        topup_status: row.try_get::<String, _>("topup_status")?.into(),
        gateway_response,
        external_response,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        expires_at: row.try_get::<DateTime<Utc>, _>("expires_at")?,
    })
}

fn json_column(row: &SqliteRow, column: &str) -> Result<Option<Value>, SqliteDatabaseError> {
    let text: Option<String> = row.try_get(column)?;
    Ok(text.map(|t| serde_json::from_str(&t)).transpose()?)
}
