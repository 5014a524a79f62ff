use crate::db_types::{NewOrder, Order, OrderId, OrderUpdate};

/// Storage behaviour required by the order lifecycle manager.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persists a brand-new order in its initial state (all three status axes `Pending`). Fails if the order
    /// id already exists; orders are never reused across checkout attempts.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, Self::Error>;

    async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, Self::Error>;

    /// Applies the given field updates to an existing order. Fields frozen at creation time (price, product,
    /// contact info) are not part of [`OrderUpdate`] by construction.
    async fn update_order(&self, order_id: &OrderId, update: OrderUpdate) -> Result<(), Self::Error>;

    /// Atomically claims the right to dispatch fulfillment for this order.
    ///
    /// Implementations must perform a conditional transition equivalent to
    /// `SET topup_status = 'success' WHERE order_id = ? AND topup_status != 'success'` and report whether a
    /// row changed. Returning `false` means another caller already completed fulfillment; the caller must
    /// return the cached external response instead of dispatching again. A claim that is followed by a failed
    /// dispatch is rolled back to `failed` by the caller, which also re-opens the order for a later
    /// user-initiated verification retry.
    async fn claim_topup_dispatch(&self, order_id: &OrderId) -> Result<bool, Self::Error>;

    /// Bumps the order counter on the owning user record, for attribution. No-op for unknown users.
    async fn increment_user_order_count(&self, user_id: &str) -> Result<(), Self::Error>;
}
