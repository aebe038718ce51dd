//! Local liveness check for bearer tokens.
//!
//! Tokens are three dot-separated base64url segments. Only the middle
//! (claims) segment is read, and only to find `exp`. The signature is never
//! verified here; that is the backend's job. The check exists so the client
//! stops sending tokens it already knows are stale.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// A token is considered expired this long before its `exp`, so a request
/// is never authorized with a token that lapses mid-flight.
pub const EXPIRY_MARGIN_MS: i64 = 5_000;

/// Standard alphabet, padding optional, lenient trailing bits.
const CLAIMS_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode the claims segment of a token. `None` if the token is malformed.
pub fn decode_claims(token: &str) -> Option<Map<String, Value>> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let standard = parts[1].replace('-', "+").replace('_', "/");
    let bytes = CLAIMS_ENGINE.decode(standard).ok()?;
    match serde_json::from_slice::<Value>(&bytes).ok()? {
        Value::Object(claims) => Some(claims),
        _ => None,
    }
}

/// The `exp` claim in milliseconds. Missing, null, zero or non-numeric
/// values yield `None`.
fn expiration_millis(token: &str) -> Option<f64> {
    let exp = decode_claims(token)?.get("exp")?.as_f64()?;
    if exp == 0.0 || !exp.is_finite() {
        return None;
    }
    Some(exp * 1000.0)
}

/// When the token expires, if it carries a usable `exp`.
pub fn expires_at(token: &str) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(expiration_millis(token)? as i64)
}

/// Whether `token` should be treated as expired right now.
///
/// Absent, malformed and undated tokens are always expired.
pub fn is_expired(token: Option<&str>) -> bool {
    is_expired_at(token, Utc::now().timestamp_millis())
}

pub fn is_expired_at(token: Option<&str>, now_ms: i64) -> bool {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return true;
    };
    match expiration_millis(token) {
        Some(expiration_ms) => now_ms as f64 >= expiration_ms - EXPIRY_MARGIN_MS as f64,
        None => true,
    }
}
