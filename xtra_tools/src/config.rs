use gts_common::Secret;
use log::*;

#[derive(Debug, Clone, Default)]
pub struct XtraConfig {
    pub base_url: String,
    pub user_token: Secret<String>,
    /// Where the gateway sends the customer after payment. Passed verbatim with every create-order call.
    pub redirect_url: String,
}

impl XtraConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("XTRA_BASE_URL").unwrap_or_else(|_| {
            warn!("XTRA_BASE_URL not set, using https://xtragateway.site as default");
            "https://xtragateway.site".to_string()
        });
        let user_token = Secret::new(std::env::var("XTRA_USER_TOKEN").unwrap_or_else(|_| {
            warn!("XTRA_USER_TOKEN not set, using (probably useless) default");
            "00000000000000".to_string()
        }));
        let redirect_url = std::env::var("GTS_REDIRECT_URL").unwrap_or_else(|_| {
            warn!("GTS_REDIRECT_URL not set, using http://localhost:3000/payment/topup-complete as default");
            "http://localhost:3000/payment/topup-complete".to_string()
        });
        Self { base_url, user_token, redirect_url }
    }
}
