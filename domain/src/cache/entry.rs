//! Cached function result record.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::key::generate_key;
use crate::function::Arguments;

/// One cached result, shared by the fast and durable tiers.
///
/// This is also the durable record layout:
/// `{ key, functionName, argumentsJson, result, createdAt, expiresAt, sizeBytes, hitCount }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub key: String,
    pub function_name: String,
    pub arguments_json: String,
    pub result: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub size_bytes: usize,
    pub hit_count: u64,
}

impl CacheEntry {
    /// Create an entry expiring `ttl` after `now`.
    pub fn new(
        function_name: impl Into<String>,
        arguments: &Arguments,
        result: impl Into<String>,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        let function_name = function_name.into();
        let key = generate_key(&function_name, arguments);
        let arguments_json = arguments.to_json_string();
        let result = result.into();
        let size_bytes = key.len() + function_name.len() + arguments_json.len() + result.len();

        let expires_at = TimeDelta::from_std(ttl)
            .ok()
            .and_then(|delta| now.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            key,
            function_name,
            arguments_json,
            result,
            created_at: now,
            expires_at,
            size_bytes,
            hit_count: 0,
        }
    }

    /// An entry is expired from its expiry instant onward.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Time left before expiry, zero once expired.
    pub fn remaining_ttl(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).to_std().unwrap_or(Duration::ZERO)
    }

    pub fn record_hit(&mut self) {
        self.hit_count = self.hit_count.saturating_add(1);
    }
}
