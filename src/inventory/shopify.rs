use crate::Config;
use crate::error::ConfigError;
use crate::inventory::{InventoryAdjuster, InventoryError};
use crate::link::Adjustment;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

const ACCESS_TOKEN_HEADER: &str = "x-shopify-access-token";

#[derive(Debug, Serialize)]
struct AdjustRequest {
    location_id: u64,
    inventory_item_id: Value,
    available_adjustment: i64,
}

/// Admin REST API client for inventory level adjustments
#[derive(Debug, Clone)]
pub struct ShopifyClient {
    client: reqwest::Client,
    base_url: String,
    location_id: u64,
}

impl ShopifyClient {
    pub fn new(
        base_url: impl Into<String>,
        access_token: &str,
        location_id: u64,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let mut token = HeaderValue::from_str(access_token)
            .map_err(|_| ConfigError::Invalid("shopify_token is not a valid header value".into()))?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCESS_TOKEN_HEADER, token);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|error| ConfigError::Invalid(format!("HTTP client: {error}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            location_id,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let base_url = config.admin_api_base_url();
        if base_url.is_none() {
            missing.push("shopify_store");
        }
        let token = config.shopify_token.as_deref().filter(|t| !t.is_empty());
        if token.is_none() {
            missing.push("shopify_token");
        }
        if config.location_id.is_none() {
            missing.push("location_id");
        }

        let (Some(base_url), Some(token), Some(location_id)) =
            (base_url, token, config.location_id)
        else {
            return Err(ConfigError::Missing(missing));
        };

        Self::new(
            base_url,
            token,
            location_id,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turn a non-2xx response into `Rejected`, keeping the body for the operator.
    ///
    /// A 2xx means the change was applied, so its body is never an error:
    /// non-JSON text is relayed as a string and an empty body as null.
    async fn read_json(response: reqwest::Response) -> Result<Value, InventoryError> {
        let status = response.status();
        if status.is_success() {
            return Ok(parse_body(response.text().await?));
        }

        let body = parse_body(response.text().await.unwrap_or_default());
        Err(InventoryError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

fn parse_body(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text))
}

/// Numeric ids are sent as JSON numbers, anything else as a string.
fn inventory_item_id(adjustment: &Adjustment) -> Value {
    let raw = adjustment.target_id.as_str();
    match raw.parse::<u64>() {
        Ok(id) => Value::from(id),
        Err(_) => Value::from(raw),
    }
}

#[async_trait]
impl InventoryAdjuster for ShopifyClient {
    async fn adjust(&self, adjustment: &Adjustment) -> Result<Value, InventoryError> {
        let request = AdjustRequest {
            location_id: self.location_id,
            inventory_item_id: inventory_item_id(adjustment),
            available_adjustment: adjustment.direction.delta(),
        };
        debug!(?request, "Posting inventory adjustment");

        let response = self
            .client
            .post(format!("{}/inventory_levels/adjust.json", self.base_url))
            .json(&request)
            .send()
            .await?;

        match Self::read_json(response).await {
            Ok(data) => {
                info!(
                    target_id = %adjustment.target_id,
                    delta = adjustment.direction.delta(),
                    "Inventory adjusted"
                );
                Ok(data)
            }
            Err(error) => {
                warn!(target_id = %adjustment.target_id, %error, "Inventory adjustment rejected");
                Err(error)
            }
        }
    }

    async fn ping(&self) -> Result<String, InventoryError> {
        let response = self
            .client
            .get(format!("{}/shop.json", self.base_url))
            .send()
            .await?;
        let data = Self::read_json(response).await?;

        Ok(data
            .pointer("/shop/name")
            .and_then(Value::as_str)
            .unwrap_or("ok")
            .to_string())
    }
}
