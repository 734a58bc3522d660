use crate::clock::{Clock, SystemClock};
use crate::error::ConfigError;
use crate::inventory::{InventoryAdjuster, ShopifyClient};
use crate::link::LinkSigner;
use crate::Config;
use std::sync::Arc;
use tracing::info;

/// Shared, immutable per-process state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub signer: Arc<LinkSigner>,
    pub adjuster: Arc<dyn InventoryAdjuster>,
    pub clock: Arc<dyn Clock>,
    pub default_ttl_secs: u64,
    pub public_url: Option<String>,
}

impl AppState {
    pub fn new(
        signer: LinkSigner,
        adjuster: Arc<dyn InventoryAdjuster>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            signer: Arc::new(signer),
            adjuster,
            clock,
            default_ttl_secs: crate::link::DEFAULT_TTL_SECS,
            public_url: None,
        }
    }

    /// Build production state: signing key, Shopify client and system clock.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let secret = config
            .link_secret
            .as_deref()
            .ok_or(ConfigError::Missing(vec!["link_secret"]))?;
        let signer = LinkSigner::new(secret)?;
        let client = ShopifyClient::from_config(config)?;
        info!(base_url = client.base_url(), "Inventory API configured");

        Ok(Self::new(signer, Arc::new(client), Arc::new(SystemClock))
            .with_default_ttl(config.default_ttl_secs)
            .with_public_url(config.public_url.clone()))
    }

    pub fn with_default_ttl(mut self, secs: u64) -> Self {
        self.default_ttl_secs = secs;
        self
    }

    pub fn with_public_url(mut self, url: Option<String>) -> Self {
        self.public_url = url.map(|url| url.trim_end_matches('/').to_string());
        self
    }

    pub fn now(&self) -> u64 {
        self.clock.now_secs()
    }
}
