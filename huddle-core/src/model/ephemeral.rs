use crate::model::payload::non_null_raw;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use std::fmt;

/// Token minted by a joining client for a single join attempt.
///
/// Any JSON value the client picks is kept as raw text and relayed back untouched.
#[derive(Clone, Serialize)]
#[serde(transparent)]
pub struct EphemeralId(Box<RawValue>);

impl EphemeralId {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        RawValue::from_string(json.to_string()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.get()
    }
}

impl<'de> Deserialize<'de> for EphemeralId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        non_null_raw(deserializer).map(Self)
    }
}

impl PartialEq for EphemeralId {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for EphemeralId {}

impl fmt::Debug for EphemeralId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EphemeralId").field(&self.as_str()).finish()
    }
}
