//! The inventory backend that redeemed links are applied to.

pub mod shopify;

pub use shopify::ShopifyClient;

use crate::link::Adjustment;
use async_trait::async_trait;
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Inventory API timed out")]
    Timeout,

    #[error("Inventory API request failed: {0}")]
    Transport(String),

    #[error("Inventory API returned {status}")]
    Rejected { status: u16, body: Value },

    #[error("Inventory API returned an unreadable response: {0}")]
    InvalidResponse(String),
}

impl InventoryError {
    /// Payload shown to the operator: the upstream body when there is one,
    /// otherwise the error message.
    pub fn detail(&self) -> Value {
        match self {
            InventoryError::Rejected { body, .. } => body.clone(),
            other => json!(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for InventoryError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            InventoryError::Timeout
        } else if error.is_decode() {
            InventoryError::InvalidResponse(error.to_string())
        } else {
            InventoryError::Transport(error.to_string())
        }
    }
}

/// Applies validated adjustments to an external counter.
///
/// Calls are not retried and not deduplicated: two redemptions of the same
/// link produce two adjustments.
#[async_trait]
pub trait InventoryAdjuster: Send + Sync {
    /// Apply the adjustment and return the backend's view of the new state.
    async fn adjust(&self, adjustment: &Adjustment) -> Result<Value, InventoryError>;

    /// Check the backend is reachable; returns a display name.
    async fn ping(&self) -> Result<String, InventoryError>;
}
