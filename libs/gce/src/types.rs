//! Wire types for the Compute Engine instances API.

use serde::{Deserialize, Deserializer};

/// A compute instance, reduced to the fields the client consumes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    /// Numeric instance identifier. The API encodes it as a decimal string.
    #[serde(deserialize_with = "u64_from_string")]
    pub id: u64,

    pub name: String,

    #[serde(default)]
    pub status: Option<String>,
}

/// One page of a zonal instances listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceList {
    /// Empty pages omit `items` entirely.
    #[serde(default)]
    pub items: Vec<Instance>,

    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Instance ids exceed 2^53, so the API serializes them as strings.
fn u64_from_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(u64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}
