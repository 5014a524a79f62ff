use chrono::{Duration, Utc};
use gts_common::Price;
use mockall::mock;
use thiserror::Error;
use topup_engine::{
    catalog::{CatalogItem, GameInfo},
    db_types::{NewOrder, Order, OrderId, OrderStatus, OrderUpdate, PaymentStatus, PricingConfig, Role, TopupStatus},
    traits::{
        GatewayPollResult,
        OrderManagement,
        PaymentGateway,
        PaymentSession,
        PricingManagement,
        ProductCatalog,
        TopupOutcome,
        TopupProvider,
        TopupRequest,
        UpstreamApiError,
    },
};

#[derive(Debug, Clone, Error)]
pub struct MockErr {
    pub message: String,
}

impl std::fmt::Display for MockErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

mock! {
    pub OrderDb {}
    impl OrderManagement for OrderDb {
        type Error = MockErr;
        async fn insert_order(&self, order: NewOrder) -> Result<Order, MockErr>;
        async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, MockErr>;
        async fn update_order(&self, order_id: &OrderId, update: OrderUpdate) -> Result<(), MockErr>;
        async fn claim_topup_dispatch(&self, order_id: &OrderId) -> Result<bool, MockErr>;
        async fn increment_user_order_count(&self, user_id: &str) -> Result<(), MockErr>;
    }
}

mock! {
    pub Gateway {}
    impl PaymentGateway for Gateway {
        async fn initiate_payment(&self, order: &NewOrder) -> Result<PaymentSession, UpstreamApiError>;
        async fn check_payment_status(&self, order_id: &OrderId) -> Result<GatewayPollResult, UpstreamApiError>;
    }
}

mock! {
    pub Fulfillment {}
    impl TopupProvider for Fulfillment {
        async fn dispatch_topup(&self, request: TopupRequest) -> Result<TopupOutcome, UpstreamApiError>;
    }
}

mock! {
    pub PricingDb {}
    impl PricingManagement for PricingDb {
        type Error = MockErr;
        async fn fetch_pricing_config(&self, role: Role) -> Result<Option<PricingConfig>, MockErr>;
        async fn upsert_pricing_config(&self, config: PricingConfig) -> Result<PricingConfig, MockErr>;
    }
}

mock! {
    pub Catalog {}
    impl ProductCatalog for Catalog {
        async fn fetch_game(&self, game_slug: &str) -> Result<Option<GameInfo>, UpstreamApiError>;
    }
}

//--------------------------------------      Fixtures      ----------------------------------------------------------

pub fn mobile_legends() -> GameInfo {
    GameInfo {
        game_slug: "mobile-legends".to_string(),
        game_name: "Mobile Legends".to_string(),
        items: vec![
            CatalogItem {
                item_name: "86 Diamonds".to_string(),
                item_slug: "ml-86".to_string(),
                selling_price: Price::from(100),
                available: true,
            },
            CatalogItem {
                item_name: "344 Diamonds".to_string(),
                item_slug: "ml-344".to_string(),
                selling_price: Price::from(350),
                available: true,
            },
        ],
    }
}

/// A pending order that belongs to `user-1`, half an hour away from expiry.
pub fn stored_order() -> Order {
    let now = Utc::now();
    Order {
        id: 1,
        order_id: OrderId("TOPUP_lz1abc2d_0011223344556677".to_string()),
        gateway_order_id: Some("GW-1".to_string()),
        user_id: Some("user-1".to_string()),
        game_slug: "mobile-legends".to_string(),
        item_slug: "ml-86".to_string(),
        item_name: "86 Diamonds".to_string(),
        player_id: "12345678".to_string(),
        zone_id: "9876".to_string(),
        payment_method: "upi".to_string(),
        price: Price::from(100),
        currency: "INR".to_string(),
        email: None,
        phone: Some("9999999999".to_string()),
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Pending,
        topup_status: TopupStatus::Pending,
        gateway_response: None,
        external_response: None,
        created_at: now,
        updated_at: now,
        expires_at: now + Duration::minutes(30),
    }
}

/// Builds the row the store would hand back after a successful insert.
pub fn inserted(order: NewOrder) -> Order {
    let now = Utc::now();
    Order {
        id: 1,
        order_id: order.order_id,
        gateway_order_id: None,
        user_id: order.user_id,
        game_slug: order.game_slug,
        item_slug: order.item_slug,
        item_name: order.item_name,
        player_id: order.player_id,
        zone_id: order.zone_id,
        payment_method: order.payment_method,
        price: order.price,
        currency: order.currency,
        email: order.email,
        phone: order.phone,
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Pending,
        topup_status: TopupStatus::Pending,
        gateway_response: None,
        external_response: None,
        created_at: now,
        updated_at: now,
        expires_at: order.expires_at,
    }
}
