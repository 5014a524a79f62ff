use actix_web::{http::StatusCode, web, web::ServiceConfig};
use mockall::predicate::eq;
use serde_json::json;
use topup_engine::{
    db_types::{PriceOverride, PricingConfig, Role, Slab},
    PricingApi,
};

use super::{
    helpers::{get_request, issue_token},
    mocks::{mobile_legends, MockCatalog, MockPricingDb},
};
use crate::routes::GetGameRoute;

fn register(cfg: &mut ServiceConfig, pricing_db: MockPricingDb, catalog: MockCatalog) {
    let pricing_api = PricingApi::new(pricing_db, catalog);
    cfg.service(GetGameRoute::<MockPricingDb, MockCatalog>::new()).app_data(web::Data::new(pricing_api));
}

#[actix_web::test]
async fn anonymous_browsing_sees_plain_user_prices() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/games/mobile-legends", configure_plain).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["gameName"], "Mobile Legends");
    assert_eq!(body["data"]["items"][0]["sellingPrice"], 100);
}

fn configure_plain(cfg: &mut ServiceConfig) {
    let mut pricing_db = MockPricingDb::new();
    pricing_db.expect_fetch_pricing_config().with(eq(Role::User)).returning(|_| Ok(None));
    let mut catalog = MockCatalog::new();
    catalog.expect_fetch_game().returning(|_| Ok(Some(mobile_legends())));
    register(cfg, pricing_db, catalog);
}

#[actix_web::test]
async fn garbage_tokens_do_not_block_browsing() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("not.a.jwt", "/games/mobile-legends", configure_plain).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"][0]["sellingPrice"], 100);
}

#[actix_web::test]
async fn members_browse_at_their_adjusted_prices() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(Some("user-1"), Role::Member);
    let (status, body) = get_request(&token, "/games/mobile-legends", configure_member).await;
    assert_eq!(status, StatusCode::OK);
    // 100 falls in the 12% slab; 350 has an exact override
    assert_eq!(body["data"]["items"][0]["sellingPrice"], 112);
    assert_eq!(body["data"]["items"][1]["sellingPrice"], 333);
}

fn configure_member(cfg: &mut ServiceConfig) {
    let mut pricing_db = MockPricingDb::new();
    // Members read the admin record; the member role never reaches storage
    pricing_db.expect_fetch_pricing_config().with(eq(Role::Admin)).returning(|_| {
        Ok(Some(PricingConfig {
            user_type: Role::Admin,
            slabs: vec![Slab { min: 0, max: 200, percent: 12.0 }],
            overrides: vec![PriceOverride {
                game_slug: "mobile-legends".to_string(),
                item_slug: "ml-344".to_string(),
                fixed_price: 333,
            }],
        }))
    });
    let mut catalog = MockCatalog::new();
    catalog.expect_fetch_game().returning(|_| Ok(Some(mobile_legends())));
    register(cfg, pricing_db, catalog);
}

#[actix_web::test]
async fn static_products_need_no_catalog_call() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/games/netflix", configure_idle).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["gameSlug"], "netflix");
    assert_eq!(body["data"]["items"][0]["sellingPrice"], 199);
}

#[actix_web::test]
async fn unknown_games_get_the_not_found_envelope() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/games/no-such-game", configure_unknown).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": false, "message": "Game not found"}));
}

fn configure_idle(cfg: &mut ServiceConfig) {
    register(cfg, MockPricingDb::new(), MockCatalog::new());
}

fn configure_unknown(cfg: &mut ServiceConfig) {
    let mut catalog = MockCatalog::new();
    catalog.expect_fetch_game().with(eq("no-such-game")).returning(|_| Ok(None));
    register(cfg, MockPricingDb::new(), catalog);
}
