use thiserror::Error;

/// Fatal startup errors. The process exits before binding a listener.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
