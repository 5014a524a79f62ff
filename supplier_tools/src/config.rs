use gts_common::Secret;
use log::*;

#[derive(Debug, Clone, Default)]
pub struct SupplierConfig {
    pub base_url: String,
    pub api_key: Secret<String>,
}

impl SupplierConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("SUPPLIER_BASE_URL").unwrap_or_else(|_| {
            warn!("SUPPLIER_BASE_URL not set, using (probably useless) default");
            "https://api.example-supplier.com".to_string()
        });
        let api_key = Secret::new(std::env::var("SUPPLIER_API_KEY").unwrap_or_else(|_| {
            warn!("SUPPLIER_API_KEY not set, using (probably useless) default");
            "00000000000000".to_string()
        }));
        Self { base_url, api_key }
    }
}
