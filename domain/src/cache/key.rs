//! Content-derived cache keys.

use sha2::{Digest, Sha256};

use crate::function::Arguments;

/// Deterministic fingerprint of a function call.
///
/// Pairs are rendered `key:value` in ascending key order (values as compact
/// JSON, whose object keys are themselves sorted), joined with `|` and
/// prefixed with `function_name|`. The SHA-256 digest of that string is
/// returned as 64 lowercase hex characters.
pub fn generate_key(function_name: &str, arguments: &Arguments) -> String {
    let mut pairs: Vec<_> = arguments.iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let rendered: Vec<String> = pairs
        .into_iter()
        .map(|(key, value)| format!("{key}:{value}"))
        .collect();
    let material = format!("{}|{}", function_name, rendered.join("|"));
    digest_hex(material.as_bytes())
}

fn digest_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    faster_hex::hex_string(&hasher.finalize())
}
