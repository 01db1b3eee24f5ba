//! Expiry inspection for bearer tokens.
//!
//! Tokens are opaque to the client except for the `exp` claim in their
//! payload segment, which drives the local expiry checks. Decoding is
//! best effort: anything that does not parse is reported as "expiry
//! unknown" rather than an error.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};

/// Extract the expiry instant from a bearer token.
///
/// The payload segment is base64url-decoded and its `exp` claim
/// (seconds since epoch) converted to a millisecond instant. Returns
/// `None` for anything that does not decode: missing payload segment,
/// bad encoding, a non-JSON payload, or a missing or non-numeric `exp`.
pub fn decode_expiry(token: &str) -> Option<DateTime<Utc>> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    let exp = claims.get("exp")?.as_f64()?;
    DateTime::from_timestamp_millis((exp * 1000.0) as i64)
}

/// Whether a token is expired relative to `now`.
///
/// Only a decodable expiry strictly in the past counts as expired. A
/// token whose expiry cannot be decoded is treated as still valid; the
/// server stays the authority on such tokens.
pub fn is_expired(token: &str, now: DateTime<Utc>) -> bool {
    match decode_expiry(token) {
        Some(expires_at) => expires_at < now,
        None => false,
    }
}

/// Build a token whose payload carries the given expiry.
#[cfg(test)]
pub(crate) fn token_expiring_at(expires_at: DateTime<Utc>) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let exp = expires_at.timestamp_millis() as f64 / 1000.0;
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"42","exp":{}}}"#, exp));
    format!("{}.{}.sig", header, payload)
}
