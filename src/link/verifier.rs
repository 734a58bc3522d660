use crate::link::{Claims, Direction, LinkError, LinkSigner, TargetId};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

/// Raw link fields as presented on the redemption endpoint.
///
/// Query names follow the link format (`vi`, `d`, `exp`, `sig`); the long
/// names are accepted as aliases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresentedLink {
    #[serde(rename = "vi", alias = "target_id")]
    pub target_id: Option<String>,
    #[serde(rename = "d", alias = "direction")]
    pub direction: Option<String>,
    #[serde(rename = "exp", alias = "expiry")]
    pub expiry: Option<String>,
    #[serde(rename = "sig", alias = "token")]
    pub token: Option<String>,
}

/// The only data forwarded to the inventory backend after verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjustment {
    pub target_id: TargetId,
    pub direction: Direction,
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// Decide whether a presented link is valid at `now` (Unix seconds).
///
/// Checks run in order: presence, expiry, delta range, signature. The
/// signature comparison is constant time. Every failure is a [`LinkError`];
/// nothing here panics on hostile input.
pub fn verify_link(
    signer: &LinkSigner,
    presented: &PresentedLink,
    now: u64,
) -> Result<Adjustment, LinkError> {
    let (Some(target_raw), Some(direction_raw), Some(expiry_raw), Some(token_raw)) = (
        non_empty(&presented.target_id),
        non_empty(&presented.direction),
        non_empty(&presented.expiry),
        non_empty(&presented.token),
    ) else {
        return Err(LinkError::Invalid);
    };

    // One spelling per expiry: decimal digits, no leading zero.
    if !expiry_raw.bytes().all(|b| b.is_ascii_digit())
        || (expiry_raw.len() > 1 && expiry_raw.starts_with('0'))
    {
        return Err(LinkError::Invalid);
    }
    let expiry = expiry_raw.parse::<u64>().map_err(|_| LinkError::Invalid)?;
    if expiry < now {
        return Err(LinkError::Expired);
    }

    let direction = Direction::parse(direction_raw).ok_or(LinkError::InvalidDelta)?;
    let target_id = TargetId::parse(target_raw).ok_or(LinkError::Invalid)?;

    let claims = Claims::new(target_id, direction, expiry);
    let expected = signer.sign(&claims);

    // Slices of different length compare as unequal.
    let matches: bool = expected
        .as_str()
        .as_bytes()
        .ct_eq(token_raw.as_bytes())
        .into();
    if !matches {
        return Err(LinkError::Invalid);
    }

    let Claims {
        target_id,
        direction,
        ..
    } = claims;
    Ok(Adjustment {
        target_id,
        direction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_700_000_000;

    fn signer() -> LinkSigner {
        LinkSigner::new("verifier-test-secret").unwrap()
    }

    fn presented(target: &str, direction: &str, expiry: &str, token: &str) -> PresentedLink {
        PresentedLink {
            target_id: Some(target.to_string()),
            direction: Some(direction.to_string()),
            expiry: Some(expiry.to_string()),
            token: Some(token.to_string()),
        }
    }

    /// Sign claims and return them in presented form
    fn signed(
        signer: &LinkSigner,
        target: &str,
        direction: Direction,
        expiry: u64,
    ) -> PresentedLink {
        let claims = Claims::new(TargetId::parse(target).unwrap(), direction, expiry);
        let token = signer.sign(&claims);
        presented(
            target,
            direction.as_str(),
            &expiry.to_string(),
            token.as_str(),
        )
    }

    #[test]
    fn test_valid_link_is_accepted() {
        let signer = signer();
        let link = signed(&signer, "123", Direction::Increment, NOW + 60);

        let adjustment = verify_link(&signer, &link, NOW).unwrap();
        assert_eq!(adjustment.target_id.as_str(), "123");
        assert_eq!(adjustment.direction, Direction::Increment);

        let link = signed(&signer, "123", Direction::Decrement, NOW + 60);
        let adjustment = verify_link(&signer, &link, NOW).unwrap();
        assert_eq!(adjustment.direction, Direction::Decrement);
    }

    #[test]
    fn test_expiry_boundary() {
        let signer = signer();

        // Expiring exactly now is still valid
        let link = signed(&signer, "123", Direction::Increment, NOW);
        assert!(verify_link(&signer, &link, NOW).is_ok());

        // One second past expiry is rejected even with a correct signature
        let link = signed(&signer, "123", Direction::Increment, NOW - 1);
        assert_eq!(verify_link(&signer, &link, NOW), Err(LinkError::Expired));

        let link = signed(&signer, "123", Direction::Increment, NOW + 60);
        assert!(verify_link(&signer, &link, NOW + 60).is_ok());
        assert_eq!(
            verify_link(&signer, &link, NOW + 61),
            Err(LinkError::Expired)
        );
    }

    #[test]
    fn test_missing_or_empty_fields_are_invalid() {
        let signer = signer();
        let valid = signed(&signer, "123", Direction::Increment, NOW + 60);

        let mut link = valid.clone();
        link.target_id = None;
        assert_eq!(verify_link(&signer, &link, NOW), Err(LinkError::Invalid));

        let mut link = valid.clone();
        link.direction = Some(String::new());
        assert_eq!(verify_link(&signer, &link, NOW), Err(LinkError::Invalid));

        let mut link = valid.clone();
        link.expiry = None;
        assert_eq!(verify_link(&signer, &link, NOW), Err(LinkError::Invalid));

        let mut link = valid;
        link.token = Some(String::new());
        assert_eq!(verify_link(&signer, &link, NOW), Err(LinkError::Invalid));

        assert_eq!(
            verify_link(&signer, &PresentedLink::default(), NOW),
            Err(LinkError::Invalid)
        );
    }

    #[test]
    fn test_tampered_fields_are_rejected() {
        let signer = signer();
        let valid = signed(&signer, "123", Direction::Increment, NOW + 60);

        let mut link = valid.clone();
        link.direction = Some("-1".to_string());
        assert_eq!(verify_link(&signer, &link, NOW), Err(LinkError::Invalid));

        let mut link = valid.clone();
        link.target_id = Some("124".to_string());
        assert_eq!(verify_link(&signer, &link, NOW), Err(LinkError::Invalid));

        let mut link = valid.clone();
        link.expiry = Some((NOW + 61).to_string());
        assert_eq!(verify_link(&signer, &link, NOW), Err(LinkError::Invalid));

        let mut link = valid;
        let mut token = link.token.clone().unwrap();
        let last = if token.ends_with('0') { "1" } else { "0" };
        token.replace_range(token.len() - 1.., last);
        link.token = Some(token);
        assert_eq!(verify_link(&signer, &link, NOW), Err(LinkError::Invalid));
    }

    #[test]
    fn test_token_from_other_key_is_rejected() {
        let other = LinkSigner::new("someone-else").unwrap();
        let link = signed(&other, "123", Direction::Increment, NOW + 60);
        assert_eq!(verify_link(&signer(), &link, NOW), Err(LinkError::Invalid));
    }

    #[test]
    fn test_malformed_tokens_are_rejected_without_panic() {
        let signer = signer();
        let valid = signed(&signer, "123", Direction::Increment, NOW + 60);
        let good = valid.token.clone().unwrap();

        for bad in [
            "zz".to_string(),
            good[..63].to_string(),
            format!("{good}0"),
            good.to_uppercase(),
            "not hex at all \u{1F600}".to_string(),
        ] {
            let mut link = valid.clone();
            link.token = Some(bad.clone());
            assert_eq!(
                verify_link(&signer, &link, NOW),
                Err(LinkError::Invalid),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_non_numeric_expiry_is_invalid() {
        let signer = signer();
        let valid = signed(&signer, "123", Direction::Increment, NOW + 60);

        for bad in ["soon", "-5", "+1800000000", "1.5", "99999999999999999999999"] {
            let mut link = valid.clone();
            link.expiry = Some(bad.to_string());
            assert_eq!(
                verify_link(&signer, &link, NOW),
                Err(LinkError::Invalid),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_zero_padded_expiry_is_rejected() {
        let signer = signer();
        let valid = signed(&signer, "123", Direction::Increment, NOW + 60);

        for padded in [format!("0{}", NOW + 60), format!("000{}", NOW + 60)] {
            let mut link = valid.clone();
            link.expiry = Some(padded.clone());
            assert_eq!(
                verify_link(&signer, &link, NOW),
                Err(LinkError::Invalid),
                "{padded:?} should be rejected"
            );
        }
        assert!(verify_link(&signer, &valid, NOW).is_ok());

        // A bare zero is the canonical rendering of expiry 0
        let link = signed(&signer, "123", Direction::Increment, 0);
        assert_eq!(link.expiry.as_deref(), Some("0"));
        assert!(verify_link(&signer, &link, 0).is_ok());
    }

    #[test]
    fn test_out_of_range_delta_is_rejected() {
        let signer = signer();
        let expiry = (NOW + 60).to_string();

        for bad in ["0", "2", "+1", "abc", "-2"] {
            // A token that is correct for the message built from the raw text
            // must still not pass the delta domain check.
            let message = format!("123.{bad}.{expiry}");
            let token = {
                use hmac::{Hmac, Mac};
                let mut mac =
                    Hmac::<sha2::Sha256>::new_from_slice(b"verifier-test-secret").unwrap();
                mac.update(message.as_bytes());
                hex::encode(mac.finalize().into_bytes())
            };
            let link = presented("123", bad, &expiry, &token);
            assert_eq!(
                verify_link(&signer, &link, NOW),
                Err(LinkError::InvalidDelta),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_same_link_verifies_repeatedly() {
        let signer = signer();
        let link = signed(&signer, "123", Direction::Increment, NOW + 60);

        let first = verify_link(&signer, &link, NOW).unwrap();
        let second = verify_link(&signer, &link, NOW + 30).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_presented_link_accepts_long_names() {
        let link: PresentedLink =
            serde_qs::from_str("target_id=9&direction=-1&expiry=10&token=ab").unwrap();
        assert_eq!(link.target_id.as_deref(), Some("9"));
        assert_eq!(link.direction.as_deref(), Some("-1"));
        assert_eq!(link.expiry.as_deref(), Some("10"));
        assert_eq!(link.token.as_deref(), Some("ab"));

        let link: PresentedLink = serde_qs::from_str("vi=9&d=1&exp=10&sig=ab").unwrap();
        assert_eq!(link.target_id.as_deref(), Some("9"));
        assert_eq!(link.direction.as_deref(), Some("1"));
    }
}
