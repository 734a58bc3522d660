//! Signed inventory links: claim model, signing, verification and issuing.

pub mod claims;
pub mod error;
pub mod issue;
pub mod signer;
pub mod verifier;

pub use claims::{Claims, Direction, TargetId};
pub use error::{
    INVALID_DELTA_MESSAGE, INVALID_LINK_MESSAGE, LinkError, USAGE_MESSAGE, UsageError,
};
pub use issue::{DEFAULT_TTL_SECS, IssueParams, IssuedLink, LinkRequest};
pub use signer::{LinkSigner, Token};
pub use verifier::{Adjustment, PresentedLink, verify_link};
