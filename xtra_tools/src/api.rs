use std::{sync::Arc, time::Duration};

use gts_common::extract::string_at;
use log::*;
use reqwest::Client;
use serde_json::Value;

use crate::{
    config::XtraConfig,
    data_objects::{NewPaymentSession, OrderStatusSnapshot},
    XtraApiError,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct XtraPayApi {
    config: XtraConfig,
    client: Arc<Client>,
}

impl XtraPayApi {
    pub fn new(config: XtraConfig) -> Result<Self, XtraApiError> {
        let client =
            Client::builder().timeout(REQUEST_TIMEOUT).build().map_err(|e| XtraApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Opens a hosted payment session for `order_id` over `amount` whole currency units.
    ///
    /// The gateway wraps its outcome in a `status` flag rather than HTTP status codes; a `false` flag is
    /// surfaced as [`XtraApiError::Declined`].
    pub async fn create_payment(
        &self,
        order_id: &str,
        amount: i64,
        phone: Option<&str>,
    ) -> Result<NewPaymentSession, XtraApiError> {
        let amount = amount.to_string();
        let mut form: Vec<(&str, &str)> = Vec::with_capacity(5);
        if let Some(phone) = phone {
            form.push(("customer_mobile", phone));
        }
        form.push(("user_token", self.config.user_token.reveal().as_str()));
        form.push(("amount", amount.as_str()));
        form.push(("order_id", order_id));
        form.push(("redirect_url", self.config.redirect_url.as_str()));

        debug!("Opening payment session for order {order_id}, amount {amount}");
        let response = self.form_post("/api/create-order", &form).await?;
        if string_at(&response, "result.orderId").is_none() || !response["status"].as_bool().unwrap_or(false) {
            let message = string_at(&response, "message").unwrap_or("no message").to_string();
            warn!("Gateway declined session for order {order_id}: {message}");
            return Err(XtraApiError::Declined(message));
        }
        let session = NewPaymentSession {
            order_id: string_at(&response, "result.orderId").unwrap_or_default().to_string(),
            payment_url: string_at(&response, "result.payment_url").unwrap_or_default().to_string(),
        };
        if session.payment_url.is_empty() {
            return Err(XtraApiError::ResponseError("create-order response carried no payment_url".to_string()));
        }
        info!("Payment session open for order {order_id}: gateway id {}", session.order_id);
        Ok(session)
    }

    /// Polls the settlement status of `order_id`. The snapshot keeps the raw body; interpretation of the
    /// status code and amount is the caller's business.
    pub async fn check_order_status(&self, order_id: &str) -> Result<OrderStatusSnapshot, XtraApiError> {
        let form = [("user_token", self.config.user_token.reveal().as_str()), ("order_id", order_id)];
        trace!("Polling gateway status for order {order_id}");
        let response = self.form_post("/api/check-order-status", &form).await?;
        let snapshot = OrderStatusSnapshot::from_response(response);
        trace!("Order {order_id} status: {:?}, amount {:?}", snapshot.txn_status, snapshot.amount);
        Ok(snapshot)
    }

    async fn form_post(&self, path: &str, form: &[(&str, &str)]) -> Result<Value, XtraApiError> {
        let url = format!("{}{path}", self.config.base_url);
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| XtraApiError::ResponseError(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| XtraApiError::ResponseError(e.to_string()))?;
            return Err(XtraApiError::QueryError { status, message });
        }
        response.json::<Value>().await.map_err(|e| XtraApiError::JsonError(e.to_string()))
    }
}
