use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use std::fmt;

/// Opaque negotiation payload (session description or ICE candidate).
///
/// Holds the exact JSON text the sender produced. It is written back out verbatim,
/// so whatever the target receives is byte-identical to what the source sent.
/// `null` counts as missing and is rejected.
#[derive(Clone, Serialize)]
#[serde(transparent)]
pub struct Payload(Box<RawValue>);

impl Payload {
    /// Wraps a JSON text. Fails if `json` is not a single valid JSON value.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        RawValue::from_string(json.to_string()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.get()
    }
}

/// Reads any JSON value as raw text, refusing `null`.
pub(crate) fn non_null_raw<'de, D>(deserializer: D) -> Result<Box<RawValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    if raw.get().trim() == "null" {
        return Err(D::Error::custom("value must not be null"));
    }
    Ok(raw)
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        non_null_raw(deserializer).map(Self)
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Payload {}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Payload").field(&self.as_str()).finish()
    }
}
