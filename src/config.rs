use crate::error::ConfigError;
use crate::link::DEFAULT_TTL_SECS;
use anyhow::Result;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Main configuration structure that can be loaded from CLI, environment or config file
///
/// Example configuration file content
/// # Stock Link Configuration
///
/// # Server configuration
/// listen_on_port = 3000
/// public_url = "https://links.example.com"  # Optional: defaults to the request Host
/// default_ttl_secs = 31536000
///
/// # Inventory API
/// shopify_store = "my-shop.myshopify.com"
/// shopify_token = "shpat_xxx"
/// location_id = 123456789
/// api_version = "2024-10"
/// request_timeout_secs = 10
///
/// # Link signing
/// link_secret = "long random string"
#[derive(Clone, Serialize, Deserialize, Parser)]
#[command(version, about, long_about = None)]
#[serde(default)]
pub struct Config {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    #[serde(default = "default_port")]
    pub listen_on_port: u16,

    /// Configuration file path (CLI and environment values take precedence)
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Shop domain, e.g. my-shop.myshopify.com
    #[arg(long, env = "SHOPIFY_STORE")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopify_store: Option<String>,

    /// Admin API access token
    #[arg(long, env = "SHOPIFY_TOKEN", hide_env_values = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopify_token: Option<String>,

    /// Location whose inventory levels are adjusted
    #[arg(long, env = "LOCATION_ID")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<u64>,

    /// Secret used to sign and verify links
    #[arg(long, env = "LINK_SECRET", hide_env_values = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_secret: Option<String>,

    /// Admin API version
    #[arg(long, env = "SHOPIFY_API_VERSION", default_value = "2024-10")]
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Admin API base URL, overrides the one derived from shopify_store
    #[arg(long, env = "SHOPIFY_API_BASE_URL")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    /// Base URL used in generated links (defaults to the request Host)
    #[arg(long, env = "PUBLIC_URL")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,

    /// Timeout of inventory API calls in seconds
    #[arg(long, default_value_t = 10)]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Lifetime of generated links when no ttl is given
    #[arg(long, env = "LINK_TTL", default_value_t = DEFAULT_TTL_SECS)]
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_on_port: default_port(),
            config: None,
            shopify_store: None,
            shopify_token: None,
            location_id: None,
            link_secret: None,
            api_version: default_api_version(),
            api_base_url: None,
            public_url: None,
            request_timeout_secs: default_request_timeout_secs(),
            default_ttl_secs: default_ttl_secs(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("Config")
            .field("listen_on_port", &self.listen_on_port)
            .field("config", &self.config)
            .field("shopify_store", &self.shopify_store)
            .field("shopify_token", &redact(&self.shopify_token))
            .field("location_id", &self.location_id)
            .field("link_secret", &redact(&self.link_secret))
            .field("api_version", &self.api_version)
            .field("api_base_url", &self.api_base_url)
            .field("public_url", &self.public_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("default_ttl_secs", &self.default_ttl_secs)
            .finish()
    }
}

impl Config {
    /// Load configuration from CLI args and environment, optionally merging with a config file
    pub fn load() -> Result<Self> {
        let mut config = Config::parse();

        if let Some(config_path) = &config.config {
            let file_config = Self::from_file(Path::new(config_path))?;
            config = config.merge_with_file(file_config);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Merge with file config, CLI args take precedence
    fn merge_with_file(mut self, file_config: Config) -> Self {
        // If CLI value is default, use file value
        if self.listen_on_port == default_port() {
            self.listen_on_port = file_config.listen_on_port;
        }
        if self.api_version == default_api_version() {
            self.api_version = file_config.api_version;
        }
        if self.request_timeout_secs == default_request_timeout_secs() {
            self.request_timeout_secs = file_config.request_timeout_secs;
        }
        if self.default_ttl_secs == default_ttl_secs() {
            self.default_ttl_secs = file_config.default_ttl_secs;
        }

        // For Option fields, CLI takes precedence if Some
        if self.shopify_store.is_none() {
            self.shopify_store = file_config.shopify_store;
        }
        if self.shopify_token.is_none() {
            self.shopify_token = file_config.shopify_token;
        }
        if self.location_id.is_none() {
            self.location_id = file_config.location_id;
        }
        if self.link_secret.is_none() {
            self.link_secret = file_config.link_secret;
        }
        if self.api_base_url.is_none() {
            self.api_base_url = file_config.api_base_url;
        }
        if self.public_url.is_none() {
            self.public_url = file_config.public_url;
        }

        self
    }

    /// Validate the configuration, reporting every missing field at once
    pub fn validate(&self) -> Result<(), ConfigError> {
        let is_blank =
            |value: &Option<String>| value.as_ref().map(|s| s.is_empty()).unwrap_or(true);

        let mut missing = Vec::new();
        if is_blank(&self.shopify_store) && is_blank(&self.api_base_url) {
            missing.push("shopify_store");
        }
        if is_blank(&self.shopify_token) {
            missing.push("shopify_token");
        }
        if self.location_id.is_none() {
            missing.push("location_id");
        }
        if is_blank(&self.link_secret) {
            missing.push("link_secret");
        }
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        for (name, url) in [
            ("api_base_url", &self.api_base_url),
            ("public_url", &self.public_url),
        ] {
            if let Some(url) = url
                && !url.starts_with("http://")
                && !url.starts_with("https://")
            {
                return Err(ConfigError::Invalid(format!(
                    "{name} must start with http:// or https://"
                )));
            }
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Base URL of the Admin REST API
    pub fn admin_api_base_url(&self) -> Option<String> {
        if let Some(url) = self.api_base_url.as_ref().filter(|url| !url.is_empty()) {
            return Some(url.trim_end_matches('/').to_string());
        }

        let store = self.shopify_store.as_ref().filter(|s| !s.is_empty())?;
        Some(format!("https://{store}/admin/api/{}", self.api_version))
    }
}

// Default value functions
fn default_port() -> u16 {
    3000
}

fn default_api_version() -> String {
    "2024-10".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS
}
