use axum::http::StatusCode;
use thiserror::Error;

pub const INVALID_LINK_MESSAGE: &str = "Invalid or expired link";
pub const INVALID_DELTA_MESSAGE: &str = "Delta must be 1 or -1.";
pub const USAGE_MESSAGE: &str = "Usage: /gen?vi=<inventory_item_id>&d=1|-1&ttl=seconds";

/// Reasons a presented link is rejected
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum LinkError {
    #[error("Link is missing fields, malformed or carries a bad signature")]
    Invalid,

    #[error("Link has expired")]
    Expired,

    #[error("Link delta is not 1 or -1")]
    InvalidDelta,
}

impl LinkError {
    /// Convert error to HTTP status code
    pub fn to_err_code(&self) -> StatusCode {
        match self {
            LinkError::Invalid | LinkError::Expired => StatusCode::FORBIDDEN,
            LinkError::InvalidDelta => StatusCode::BAD_REQUEST,
        }
    }

    /// Text shown to the caller. Invalid and expired links are not told apart.
    pub fn public_message(&self) -> &'static str {
        match self {
            LinkError::Invalid | LinkError::Expired => INVALID_LINK_MESSAGE,
            LinkError::InvalidDelta => INVALID_DELTA_MESSAGE,
        }
    }
}

/// Malformed or missing parameters on the issuing endpoint
#[derive(Debug, Error, Eq, PartialEq)]
pub enum UsageError {
    #[error("Missing target id")]
    MissingTarget,

    #[error("Direction must be 1 or -1, got {0:?}")]
    InvalidDirection(Option<String>),

    #[error("Invalid ttl: {0}")]
    InvalidTtl(String),

    #[error("Cannot determine link base URL: no Host header")]
    MissingHost,
}

impl UsageError {
    pub fn to_err_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}
