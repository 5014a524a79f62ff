//! JWT handling.
//!
//! The storefront issues HS256 JWTs with `userId` and `userType` claims; this server only ever verifies them.
//! Most endpoints require a valid token ([`JwtClaims`] as an extractor); the catalog endpoint accepts
//! anonymous callers and silently ignores bad tokens ([`MaybeClaims`]), pricing them as plain users.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use base64::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use log::*;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use topup_engine::db_types::Role;

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Absent for tokens issued to guest sessions.
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "userType", default)]
    pub user_type: Role,
    /// Unix-epoch expiry, if the issuer set one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Checks an `Authorization: Bearer` token against the shared secret and returns its claims.
pub fn validate_token(token: &str, config: &AuthConfig) -> Result<JwtClaims, AuthError> {
    let mut parts = token.split('.');
    let (Some(header), Some(payload), Some(signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(AuthError::InvalidToken);
    };
    let header_bytes = base64::decode_config(header, URL_SAFE_NO_PAD).map_err(|_| AuthError::InvalidToken)?;
    let header_json: serde_json::Value =
        serde_json::from_slice(&header_bytes).map_err(|_| AuthError::InvalidToken)?;
    // Pin the algorithm. A token claiming "none" (or anything else) must never pass.
    if header_json["alg"] != "HS256" {
        debug!("🔑️ Rejecting token with algorithm {}", header_json["alg"]);
        return Err(AuthError::InvalidToken);
    }
    let signature = base64::decode_config(signature, URL_SAFE_NO_PAD).map_err(|_| AuthError::InvalidToken)?;
    let mut mac = HmacSha256::new_from_slice(config.jwt_secret.reveal().as_bytes())
        .map_err(|_| AuthError::InvalidToken)?;
    mac.update(header.as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature).map_err(|_| AuthError::InvalidToken)?;

    let payload = base64::decode_config(payload, URL_SAFE_NO_PAD).map_err(|_| AuthError::InvalidToken)?;
    let claims: JwtClaims = serde_json::from_slice(&payload).map_err(|_| AuthError::InvalidToken)?;
    if claims.exp.is_some_and(|exp| Utc::now().timestamp() >= exp) {
        return Err(AuthError::InvalidToken);
    }
    Ok(claims)
}

fn claims_from_request(req: &HttpRequest) -> Result<JwtClaims, ServerError> {
    let config = req
        .app_data::<web::Data<AuthConfig>>()
        .ok_or_else(|| ServerError::InitializeError("AuthConfig is not registered on the app".to_string()))?;
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AuthError::MissingToken)?;
    Ok(validate_token(token, config)?)
}

impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(claims_from_request(req))
    }
}

/// An extractor that never fails: anonymous or bad-token callers come through as `None`.
#[derive(Debug, Clone)]
pub struct MaybeClaims(pub Option<JwtClaims>);

impl MaybeClaims {
    pub fn role(&self) -> Role {
        self.0.as_ref().map(|c| c.user_type).unwrap_or_default()
    }
}

impl FromRequest for MaybeClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(MaybeClaims(claims_from_request(req).ok())))
    }
}

/// Signs a set of claims the way the storefront does. Test support only; the server never issues tokens.
#[cfg(test)]
pub fn sign_token(claims: &JwtClaims, config: &AuthConfig) -> String {
    let header = base64::encode_config(br#"{"alg":"HS256","typ":"JWT"}"#, URL_SAFE_NO_PAD);
    let payload =
        base64::encode_config(serde_json::to_vec(claims).expect("claims always serialize"), URL_SAFE_NO_PAD);
    let mut mac = HmacSha256::new_from_slice(config.jwt_secret.reveal().as_bytes()).expect("any key length works");
    mac.update(header.as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    let signature = base64::encode_config(mac.finalize().into_bytes(), URL_SAFE_NO_PAD);
    format!("{header}.{payload}.{signature}")
}
