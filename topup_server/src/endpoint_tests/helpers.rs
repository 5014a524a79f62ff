use actix_web::{
    body::MessageBody,
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use chrono::{Duration, Utc};
use gts_common::Secret;
use serde_json::Value;
use topup_engine::db_types::Role;

use crate::{
    auth::{sign_token, JwtClaims},
    config::AuthConfig,
};

// A test secret for issuing tokens. DO NOT re-use it anywhere.
pub fn get_auth_config() -> AuthConfig {
    AuthConfig { jwt_secret: Secret::new("endpoint-test-secret-6ca13f93".to_string()) }
}

pub fn issue_token(user_id: Option<&str>, role: Role) -> String {
    let claims = JwtClaims {
        user_id: user_id.map(String::from),
        user_type: role,
        exp: Some((Utc::now() + Duration::hours(1)).timestamp()),
    };
    sign_token(&claims, &get_auth_config())
}

pub async fn get_request(token: &str, path: &str, configure: fn(&mut ServiceConfig)) -> (StatusCode, Value) {
    send(TestRequest::get().uri(path), token, configure).await
}

pub async fn post_request(
    token: &str,
    path: &str,
    body: Value,
    configure: fn(&mut ServiceConfig),
) -> (StatusCode, Value) {
    send(TestRequest::post().uri(path).set_json(body), token, configure).await
}

pub async fn patch_request(
    token: &str,
    path: &str,
    body: Value,
    configure: fn(&mut ServiceConfig),
) -> (StatusCode, Value) {
    send(TestRequest::patch().uri(path).set_json(body), token, configure).await
}

async fn send(req: TestRequest, token: &str, configure: fn(&mut ServiceConfig)) -> (StatusCode, Value) {
    let req = if token.is_empty() {
        req
    } else {
        req.insert_header(("Authorization", format!("Bearer {token}")))
    };
    let app = App::new().app_data(web::Data::new(get_auth_config())).configure(configure);
    let service = test::init_service(app).await;
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let bytes = res.into_body().try_into_bytes().unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
