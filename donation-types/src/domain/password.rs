//! Gateway timestamp and password derivation.

use base64::{Engine, prelude::BASE64_STANDARD};
use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

/// Gateway timestamp in `YYYYMMDDHHMMSS` form.
///
/// Always rendered in an explicit offset; the gateway rejects timestamps
/// that drift too far from its own local time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    pub const FORMAT: &'static str = "%Y%m%d%H%M%S";

    /// Renders `instant` as wall-clock time at `offset`.
    pub fn at(instant: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self(
            instant
                .with_timezone(&offset)
                .format(Self::FORMAT)
                .to_string(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Push-payment password: `base64(short_code ‖ pass_key ‖ timestamp)`.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn derive(short_code: &str, pass_key: &str, timestamp: &Timestamp) -> Self {
        let raw = format!("{}{}{}", short_code, pass_key, timestamp.as_str());
        Self(BASE64_STANDARD.encode(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}
