//! Bearer token payload decoding.
//!
//! Tokens are three dot-separated segments; only the middle (payload)
//! segment is inspected here. The signature segment is never checked:
//! decoding is a structural transform, not an authentication proof.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Deserialize;

/// Identity claims carried in the token payload.
///
/// Only the fields consumed by the session layer are modeled; anything else
/// in the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    /// Subject the token was issued for, normally the username.
    #[serde(default)]
    pub sub: Option<String>,
    /// Display name of the user.
    #[serde(default, rename = "fullName")]
    pub full_name: Option<String>,
}

/// Decode the payload segment of a token.
///
/// Returns `None` for anything that is not a well-formed token: a missing
/// payload segment, invalid base64, or a payload that is not a JSON object.
/// A token that fails to decode reads as "no identity" rather than an error.
pub fn decode(token: &str) -> Option<Claims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a token around the given payload JSON, with dummy header and
    /// signature segments.
    fn token_with_payload(payload: &str) -> String {
        format!("hdr.{}.sig", URL_SAFE_NO_PAD.encode(payload))
    }

    #[test]
    fn test_decode_extracts_claims() {
        let token = token_with_payload(r#"{"sub":"alice","fullName":"Alice A"}"#);
        let claims = decode(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("alice"));
        assert_eq!(claims.full_name.as_deref(), Some("Alice A"));
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let token =
            token_with_payload(r#"{"sub":"bob","fullName":"Bob B","iat":1700000000,"exp":1700003600}"#);
        let claims = decode(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("bob"));
    }

    #[test]
    fn test_decode_tolerates_missing_claims() {
        let token = token_with_payload(r#"{"iss":"someone-else"}"#);
        let claims = decode(&token).unwrap();
        assert_eq!(claims.sub, None);
        assert_eq!(claims.full_name, None);
    }

    #[test]
    fn test_decode_rejects_empty_string() {
        assert!(decode("").is_none());
    }

    #[test]
    fn test_decode_rejects_token_without_payload_segment() {
        assert!(decode("justoneblob").is_none());
    }

    #[test]
    fn test_decode_rejects_invalid_base64_payload() {
        assert!(decode("hdr.!!!not-base64!!!.sig").is_none());
    }

    #[test]
    fn test_decode_rejects_non_json_payload() {
        let token = format!("hdr.{}.sig", URL_SAFE_NO_PAD.encode("plain text"));
        assert!(decode(&token).is_none());
    }

    #[test]
    fn test_decode_rejects_non_object_payload() {
        let token = token_with_payload(r#"[1,2,3]"#);
        assert!(decode(&token).is_none());
    }

    #[test]
    fn test_decode_never_panics_on_garbage() {
        for input in ["....", "a.b", ".", "..", "\u{0}\u{1}", "a.=.c", "ab.cd.ef.gh"] {
            // Presence or absence of a result is fine; panicking is not.
            let _ = decode(input);
        }
    }
}
