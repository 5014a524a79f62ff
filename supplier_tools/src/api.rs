use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde_json::Value;

use crate::{
    data_objects::{SupplierGame, SupplierTopupOrder, TopupResult},
    SupplierApiError,
    SupplierConfig,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct SupplierApi {
    config: SupplierConfig,
    client: Arc<Client>,
}

impl SupplierApi {
    pub fn new(config: SupplierConfig) -> Result<Self, SupplierApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        let key = HeaderValue::from_str(config.api_key.reveal().as_str())
            .map_err(|e| SupplierApiError::Initialization(e.to_string()))?;
        headers.insert("x-api-key", key);
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SupplierApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Fetches a game and its item list. `Ok(None)` means the supplier knows no game under this slug (it
    /// reports that as a body without an item list rather than a 404).
    pub async fn fetch_game(&self, game_slug: &str) -> Result<Option<SupplierGame>, SupplierApiError> {
        let url = format!("{}/game/{game_slug}", self.config.base_url);
        trace!("Fetching game {game_slug} from the supplier");
        let response =
            self.client.get(url).send().await.map_err(|e| SupplierApiError::ResponseError(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| SupplierApiError::ResponseError(e.to_string()))?;
            return Err(SupplierApiError::QueryError { status, message });
        }
        let body = response.json::<Value>().await.map_err(|e| SupplierApiError::JsonError(e.to_string()))?;
        if body["data"]["itemId"].is_null() {
            debug!("Supplier has no game under slug {game_slug}");
            return Ok(None);
        }
        let game = serde_json::from_value::<SupplierGame>(body["data"].clone())
            .map_err(|e| SupplierApiError::JsonError(e.to_string()))?;
        debug!("Fetched game {game_slug}: {} items", game.items.len());
        Ok(Some(game))
    }

    /// Dispatches a top-up order. The HTTP exchange succeeding does not mean the top-up did; callers must
    /// check [`TopupResult::success`].
    pub async fn create_topup(&self, order: &SupplierTopupOrder) -> Result<TopupResult, SupplierApiError> {
        let url = format!("{}/api-service/order", self.config.base_url);
        info!("Dispatching top-up of {} for player {}", order.product_id, order.player_id);
        let response = self
            .client
            .post(url)
            .json(order)
            .send()
            .await
            .map_err(|e| SupplierApiError::ResponseError(e.to_string()))?;
        let http_ok = response.status().is_success();
        let body = response.json::<Value>().await.map_err(|e| SupplierApiError::JsonError(e.to_string()))?;
        let result = TopupResult::from_response(http_ok, body);
        if result.success {
            info!("Top-up of {} for player {} accepted", order.product_id, order.player_id);
        } else {
            warn!("Top-up of {} for player {} was not accepted", order.product_id, order.player_id);
        }
        Ok(result)
    }
}
