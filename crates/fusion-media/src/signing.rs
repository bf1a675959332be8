//! Request signing for the upload API.
//!
//! Signed parameters are sorted by name, joined as `name=value` pairs with `&`,
//! suffixed with the API secret and hashed with SHA-256.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Parameters that are sent but never part of the signature.
const UNSIGNED_PARAMS: [&str; 5] = ["file", "api_key", "resource_type", "cloud_name", "signature"];

/// Canonical string that gets hashed (without the secret).
pub fn string_to_sign(params: &[(&str, String)]) -> String {
    let sorted: BTreeMap<&str, &str> = params
        .iter()
        .filter(|(name, value)| !UNSIGNED_PARAMS.contains(name) && !value.is_empty())
        .map(|(name, value)| (*name, value.as_str()))
        .collect();

    sorted
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("&")
}

/// Hex-encoded SHA-256 signature for a parameter set.
pub fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(string_to_sign(params).as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}
