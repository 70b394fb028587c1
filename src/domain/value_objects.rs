use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Header mapping. Keys keep the case they were received with; a repeated
/// key overwrites the earlier value.
pub type Headers = HashMap<String, String>;

/// How a response body should be interpreted and rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    Json,
    Html,
    #[default]
    Raw,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Json => "json",
            ResponseType::Html => "html",
            ResponseType::Raw => "raw",
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ResponseType::Json),
            "html" => Ok(ResponseType::Html),
            "raw" => Ok(ResponseType::Raw),
            other => Err(anyhow!("Unknown response type: '{}'", other)),
        }
    }
}

/// Timing of a single execution, in seconds.
///
/// Every field is zero until observed. The total is always filled from the
/// wall clock by the executor and refined from the tool's own markers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    pub total_time: f64,
    pub connect_time: f64,
    pub transfer_time: f64,
}
