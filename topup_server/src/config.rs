use std::env;

use chrono::Duration;
use gts_common::Secret;
use log::*;
use rand::{thread_rng, RngCore};
use supplier_tools::SupplierConfig;
use xtra_tools::XtraConfig;

use crate::errors::ServerError;

const DEFAULT_GTS_HOST: &str = "127.0.0.1";
const DEFAULT_GTS_PORT: u16 = 8360;
const DEFAULT_ORDER_EXPIRY: Duration = Duration::minutes(30);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// How long a fresh order may wait for payment before verification marks it expired.
    pub order_expiry: Duration,
    pub xtra_config: XtraConfig,
    pub supplier_config: SupplierConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_GTS_HOST.to_string(),
            port: DEFAULT_GTS_PORT,
            database_url: String::default(),
            auth: AuthConfig::default(),
            order_expiry: DEFAULT_ORDER_EXPIRY,
            xtra_config: XtraConfig::default(),
            supplier_config: SupplierConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("GTS_HOST").ok().unwrap_or_else(|| DEFAULT_GTS_HOST.into());
        let port = env::var("GTS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for GTS_PORT. {e} Using the default, {DEFAULT_GTS_PORT}, instead."
                    );
                    DEFAULT_GTS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_GTS_PORT);
        let database_url = topup_engine::sqlite::db_url();
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to \
                 the default configuration."
            );
            AuthConfig::default()
        });
        let order_expiry = env::var("GTS_ORDER_EXPIRY_MINUTES")
            .map_err(|_| {
                info!(
                    "🪛️ GTS_ORDER_EXPIRY_MINUTES is not set. Using the default value of {} minutes.",
                    DEFAULT_ORDER_EXPIRY.num_minutes()
                )
            })
            .and_then(|s| {
                s.parse::<i64>()
                    .map(Duration::minutes)
                    .map_err(|e| warn!("🪛️ Invalid configuration value for GTS_ORDER_EXPIRY_MINUTES. {e}"))
            })
            .ok()
            .unwrap_or(DEFAULT_ORDER_EXPIRY);
        let xtra_config = XtraConfig::new_from_env_or_default();
        let supplier_config = SupplierConfig::new_from_env_or_default();
        Self { host, port, database_url, auth, order_expiry, xtra_config, supplier_config }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
/// The shared secret for verifying the storefront's HS256 JWTs.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: Secret<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        warn!(
            "🚨️🚨️🚨️ The JWT secret has not been set. I'm using a random value for this session. Tokens issued by \
             the storefront will NOT verify. Set GTS_JWT_SECRET in production. 🚨️🚨️🚨️"
        );
        let mut bytes = [0u8; 32];
        thread_rng().fill_bytes(&mut bytes);
        let secret = bytes.iter().map(|b| format!("{b:02x}")).collect::<String>();
        Self { jwt_secret: Secret::new(secret) }
    }
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret =
            env::var("GTS_JWT_SECRET").map_err(|e| ServerError::ConfigurationError(format!("{e} [GTS_JWT_SECRET]")))?;
        if secret.is_empty() {
            return Err(ServerError::ConfigurationError("GTS_JWT_SECRET is empty".to_string()));
        }
        Ok(Self { jwt_secret: Secret::new(secret) })
    }
}

//-------------------------------------------------  ServerOptions  ----------------------------------------------------
/// The subset of the server configuration that request handlers need. Secrets are deliberately excluded.
#[derive(Clone, Copy, Debug)]
pub struct ServerOptions {
    pub order_expiry: Duration,
}

impl ServerOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { order_expiry: config.order_expiry }
    }
}
