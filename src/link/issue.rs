use crate::link::{Claims, Direction, LinkSigner, TargetId, Token, UsageError};
use serde::{Deserialize, Serialize};

/// One year, in seconds
pub const DEFAULT_TTL_SECS: u64 = 31_536_000;

/// Raw parameters of the issuing endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueParams {
    #[serde(rename = "vi", alias = "target_id")]
    pub target_id: Option<String>,
    #[serde(rename = "d", alias = "direction")]
    pub direction: Option<String>,
    pub ttl: Option<String>,
}

/// Validated issuing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRequest {
    pub target_id: TargetId,
    pub direction: Direction,
    pub ttl_secs: u64,
}

impl LinkRequest {
    pub fn parse(params: &IssueParams, default_ttl_secs: u64) -> Result<Self, UsageError> {
        let target_id = params
            .target_id
            .as_deref()
            .and_then(TargetId::parse)
            .ok_or(UsageError::MissingTarget)?;

        let direction = params
            .direction
            .as_deref()
            .and_then(Direction::parse)
            .ok_or_else(|| UsageError::InvalidDirection(params.direction.clone()))?;

        let ttl_secs = match params.ttl.as_deref() {
            None | Some("") => default_ttl_secs,
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|error| UsageError::InvalidTtl(format!("{raw:?}: {error}")))?,
        };

        Ok(Self {
            target_id,
            direction,
            ttl_secs,
        })
    }

    /// Sign the request with `expiry = now + ttl`.
    pub fn issue(self, signer: &LinkSigner, now: u64) -> Result<IssuedLink, UsageError> {
        let expiry = now
            .checked_add(self.ttl_secs)
            .ok_or_else(|| UsageError::InvalidTtl(format!("{} overflows", self.ttl_secs)))?;
        let claims = Claims::new(self.target_id, self.direction, expiry);
        let token = signer.sign(&claims);
        Ok(IssuedLink { claims, token })
    }
}

/// Query string of a redemption link, in wire field order
#[derive(Serialize)]
struct LinkQuery<'a> {
    vi: &'a str,
    d: &'a str,
    exp: u64,
    sig: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedLink {
    pub claims: Claims,
    pub token: Token,
}

impl IssuedLink {
    pub fn query_string(&self) -> String {
        let query = LinkQuery {
            vi: self.claims.target_id.as_str(),
            d: self.claims.direction.as_str(),
            exp: self.claims.expiry,
            sig: self.token.as_str(),
        };
        // Flat struct of strings and integers always serializes.
        serde_qs::to_string(&query).unwrap_or_default()
    }

    /// Fully-qualified redemption URL under `base` (e.g. `https://host`).
    pub fn url(&self, base: &str) -> String {
        format!("{}/adjust?{}", base.trim_end_matches('/'), self.query_string())
    }
}
