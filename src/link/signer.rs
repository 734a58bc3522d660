use crate::error::ConfigError;
use crate::link::Claims;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Lowercase hex HMAC-SHA256 tag bound to one claim set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Holds the process-wide link secret and signs claim sets with it.
#[derive(Clone)]
pub struct LinkSigner {
    // Keyed once at startup, cloned per signature.
    mac: HmacSha256,
}

impl LinkSigner {
    /// An empty key is a configuration error, reported once at startup.
    pub fn new(key: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::Invalid("link secret must not be empty".to_string()));
        }
        let mac = HmacSha256::new_from_slice(&key)
            .map_err(|error| ConfigError::Invalid(format!("link secret: {error}")))?;
        Ok(Self { mac })
    }

    /// Sign a claim set. Same claims and key always give the same token.
    pub fn sign(&self, claims: &Claims) -> Token {
        let mut mac = self.mac.clone();
        mac.update(claims.canonical_message().as_bytes());
        Token(hex::encode(mac.finalize().into_bytes()))
    }
}

impl fmt::Debug for LinkSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkSigner")
            .field("key", &"<redacted>")
            .finish()
    }
}
