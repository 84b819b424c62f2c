use crate::normalize::is_truthy;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The part of an API Gateway proxy event the handler reads.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GatewayEvent {
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawRecord {
    #[serde(default, deserialize_with = "falsy_as_none")]
    pub name: Option<String>,
    #[serde(rename = "DOB", default, deserialize_with = "falsy_as_none")]
    pub dob: Option<String>,
    #[serde(default, deserialize_with = "falsy_as_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "falsy_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "falsy_as_none")]
    pub gender: Option<String>,
}

/// `null`, `false` and `0` read as an absent field; any other non-string is rejected.
fn falsy_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        other if !is_truthy(&other) => Ok(None),
        other => Err(de::Error::custom(format!(
            "invalid type: {}, expected a string",
            other
        ))),
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Pii {
    pub first_name: String,
    pub last_name: String,
    pub dob: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
    pub sex: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct NormalizedRecord {
    pub pii: Pii,
}

/// Payload posted to the scoring API.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct NormalizedBatch {
    pub rows: Vec<NormalizedRecord>,
}
