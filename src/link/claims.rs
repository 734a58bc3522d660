use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of the inventory item whose counter is adjusted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(String);

impl TargetId {
    /// Accepts any non-empty string. The meaning of the id belongs to the
    /// inventory backend.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Signed unit delta carried by a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Increment,
    Decrement,
}

impl Direction {
    /// Strict textual parse: only `"1"` and `"-1"` are accepted.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "1" => Some(Direction::Increment),
            "-1" => Some(Direction::Decrement),
            _ => None,
        }
    }

    /// Canonical text used in the signed message and in link query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Increment => "1",
            Direction::Decrement => "-1",
        }
    }

    pub fn delta(&self) -> i64 {
        match self {
            Direction::Increment => 1,
            Direction::Decrement => -1,
        }
    }

    /// Human-facing form with an explicit sign, e.g. `+1`.
    pub fn signed_label(&self) -> &'static str {
        match self {
            Direction::Increment => "+1",
            Direction::Decrement => "-1",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unsigned payload of a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub target_id: TargetId,
    pub direction: Direction,
    /// Unix timestamp (seconds) after which the link is no longer honored
    pub expiry: u64,
}

impl Claims {
    pub fn new(target_id: TargetId, direction: Direction, expiry: u64) -> Self {
        Self {
            target_id,
            direction,
            expiry,
        }
    }

    /// Message covered by the link signature: `{target_id}.{direction}.{expiry}`.
    ///
    /// Rendered from typed values, so a claim set has exactly one message.
    /// Direction and expiry never contain `.`, which keeps the split
    /// unambiguous from the right even if the target id contains periods.
    pub fn canonical_message(&self) -> String {
        format!(
            "{}.{}.{}",
            self.target_id.as_str(),
            self.direction.as_str(),
            self.expiry
        )
    }
}
