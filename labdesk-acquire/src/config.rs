use crate::error::AcquireResult;
use labdesk_model::DuplicatePolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Quiet period between the last keystroke and the lookup.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1500);

/// Upper bound for any single provider call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for acquisition workflows.
///
/// Serialized with durations in milliseconds:
/// `{"debounce_ms": 1500, "request_timeout_ms": 10000, "duplicate_policy": "reject"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquireConfig {
    /// Debounce interval for search queries.
    #[serde(rename = "debounce_ms", with = "millis")]
    pub debounce: Duration,
    /// Timeout for search, entity creation and submission calls.
    #[serde(rename = "request_timeout_ms", with = "millis")]
    pub request_timeout: Duration,
    /// What commit and manual add do with an identity already committed.
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

impl AcquireConfig {
    /// Parses a JSON config; absent keys keep their defaults.
    pub fn from_json(json: &str) -> AcquireResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let ms = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(ms)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
