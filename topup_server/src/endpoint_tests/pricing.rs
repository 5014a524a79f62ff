use actix_web::{http::StatusCode, web, web::ServiceConfig};
use mockall::predicate::eq;
use serde_json::json;
use topup_engine::{
    db_types::{PriceOverride, PricingConfig, Role, Slab},
    PricingApi,
};

use super::{
    helpers::{get_request, issue_token, patch_request},
    mocks::{MockCatalog, MockPricingDb},
};
use crate::routes::{GetPricingRoute, SavePricingRoute};

fn register(cfg: &mut ServiceConfig, pricing_db: MockPricingDb) {
    let pricing_api = PricingApi::new(pricing_db, MockCatalog::new());
    cfg.service(GetPricingRoute::<MockPricingDb, MockCatalog>::new())
        .service(SavePricingRoute::<MockPricingDb, MockCatalog>::new())
        .app_data(web::Data::new(pricing_api));
}

fn register_idle(cfg: &mut ServiceConfig) {
    register(cfg, MockPricingDb::new());
}

fn admin_config() -> PricingConfig {
    PricingConfig {
        user_type: Role::Admin,
        slabs: vec![Slab { min: 0, max: 200, percent: 12.0 }],
        overrides: vec![PriceOverride {
            game_slug: "mobile-legends".to_string(),
            item_slug: "ml-344".to_string(),
            fixed_price: 333,
        }],
    }
}

//--------------------------------------       Viewing      ----------------------------------------------------------

#[actix_web::test]
async fn viewing_pricing_requires_a_token() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/admin/pricing?userType=admin", register_idle).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized");
}

#[actix_web::test]
async fn plain_users_may_not_view_pricing() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(Some("user-1"), Role::User);
    let (status, body) = get_request(&token, "/admin/pricing?userType=admin", register_idle).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Forbidden");
}

#[actix_web::test]
async fn the_user_type_parameter_is_mandatory() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(Some("user-1"), Role::Member);
    let (status, body) = get_request(&token, "/admin/pricing", register_idle).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "userType is required");
}

#[actix_web::test]
async fn members_view_the_admin_record() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(Some("user-1"), Role::Member);
    let (status, body) = get_request(&token, "/admin/pricing?userType=member", configure_admin_record).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["slabs"][0], json!({"min": 0, "max": 200, "percent": 12.0}));
    assert_eq!(body["data"]["overrides"][0]["fixedPrice"], 333);
}

fn configure_admin_record(cfg: &mut ServiceConfig) {
    let mut pricing_db = MockPricingDb::new();
    pricing_db.expect_fetch_pricing_config().with(eq(Role::Admin)).returning(|_| Ok(Some(admin_config())));
    register(cfg, pricing_db);
}

#[actix_web::test]
async fn roles_without_a_record_see_empty_lists() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(Some("user-1"), Role::Owner);
    let (status, body) = get_request(&token, "/admin/pricing?userType=user", configure_no_record).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["slabs"], json!([]));
    assert_eq!(body["data"]["overrides"], json!([]));
}

fn configure_no_record(cfg: &mut ServiceConfig) {
    let mut pricing_db = MockPricingDb::new();
    pricing_db.expect_fetch_pricing_config().returning(|_| Ok(None));
    register(cfg, pricing_db);
}

//--------------------------------------       Writing      ----------------------------------------------------------

fn valid_patch() -> serde_json::Value {
    json!({
        "userType": "admin",
        "slabs": [{"min": 0, "max": 200, "percent": 12.0}],
        "overrides": [{"gameSlug": "mobile-legends", "itemSlug": "ml-344", "fixedPrice": 333}],
    })
}

#[actix_web::test]
async fn only_the_owner_may_write_pricing() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(Some("user-1"), Role::Admin);
    let (status, body) = patch_request(&token, "/admin/pricing", valid_patch(), register_idle).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Forbidden");
}

#[actix_web::test]
async fn the_record_may_only_be_written_for_the_admin_role() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(Some("owner-1"), Role::Owner);
    let mut body = valid_patch();
    body["userType"] = json!("member");
    let (status, body) = patch_request(&token, "/admin/pricing", body, register_idle).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Pricing can only be set for admin (member inherits it)");
}

#[actix_web::test]
async fn writes_must_name_a_user_type() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(Some("owner-1"), Role::Owner);
    let mut body = valid_patch();
    body.as_object_mut().unwrap().remove("userType");
    let (status, body) = patch_request(&token, "/admin/pricing", body, register_idle).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "userType is required");
}

#[actix_web::test]
async fn malformed_slabs_are_rejected() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(Some("owner-1"), Role::Owner);
    let mut body = valid_patch();
    body["slabs"] = json!([{"min": 200, "max": 200, "percent": 12.0}]);
    let (status, body) = patch_request(&token, "/admin/pricing", body, register_idle).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid slab format");
}

#[actix_web::test]
async fn malformed_overrides_are_rejected() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(Some("owner-1"), Role::Owner);
    let mut body = valid_patch();
    body["overrides"] = json!([{"gameSlug": "", "itemSlug": "ml-344", "fixedPrice": 333}]);
    let (status, body) = patch_request(&token, "/admin/pricing", body, register_idle).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid override format");
}

#[actix_web::test]
async fn the_owner_replaces_the_record_wholesale() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(Some("owner-1"), Role::Owner);
    let (status, body) = patch_request(&token, "/admin/pricing", valid_patch(), configure_upsert).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["userType"], "admin");
    assert_eq!(body["data"]["overrides"][0]["itemSlug"], "ml-344");
}

fn configure_upsert(cfg: &mut ServiceConfig) {
    let mut pricing_db = MockPricingDb::new();
    pricing_db
        .expect_upsert_pricing_config()
        .withf(|c| c.user_type == Role::Admin && c.slabs.len() == 1 && c.overrides.len() == 1)
        .returning(Ok);
    register(cfg, pricing_db);
}
