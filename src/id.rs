//! Arbitrary-precision numeric identifiers.
//!
//! Server ids do not fit a signed 64-bit integer in general, so they are held
//! as [`BigUint`]. On the wire (and in our own serde output) they are decimal
//! strings.

use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, XstatusError};

/// A non-negative integer of unbounded size.
///
/// Used for status ids, reply ids and user ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatusId(BigUint);

/// User ids share the status id representation.
pub type UserId = StatusId;

impl StatusId {
    /// Decode an id from a JSON value: a decimal string or a JSON integer.
    ///
    /// Integers are read from their literal digits, so values past `u64`
    /// survive. Floats and negatives are rejected.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => s.parse(),
            Value::Number(n) => n.to_string().parse(),
            other => Err(XstatusError::invalid_status_id(other.to_string())),
        }
    }
}

impl FromStr for StatusId {
    type Err = XstatusError;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.trim();
        // BigUint also accepts `+` and `_`; ids are bare digits.
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(XstatusError::invalid_status_id(s));
        }
        BigUint::parse_bytes(digits.as_bytes(), 10)
            .map(Self)
            .ok_or_else(|| XstatusError::invalid_status_id(s))
    }
}

impl From<u64> for StatusId {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl fmt::Display for StatusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for StatusId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for StatusId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}
