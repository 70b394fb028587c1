use crate::domain::value_objects::{Headers, ResponseType, Timing};
use serde::{Deserialize, Serialize};

pub const DEFAULT_METHOD: &str = "GET";

/// Represents an HTTP request to hand to the transfer tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Request {
    pub method: String,
    pub url: String,
    pub headers: Headers,
    /// Empty means no body
    pub body: String,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            method: DEFAULT_METHOD.to_string(),
            url: String::new(),
            headers: Headers::new(),
            body: String::new(),
        }
    }
}

impl Request {
    pub fn is_get(&self) -> bool {
        self.method == DEFAULT_METHOD
    }

    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }
}

/// Represents the outcome of one execution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Response {
    /// 0 when no status could be read from the output
    pub status_code: u16,
    pub headers: Headers,
    pub body: String,
    /// Pretty-printed body for JSON, otherwise a copy of `body`
    pub formatted_body: String,
    pub response_type: ResponseType,
    pub timing: Timing,
    /// Empty when no failure was observed
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
}

impl Response {
    pub fn is_failure(&self) -> bool {
        !self.error.is_empty()
    }
}

/// A request/response pair as recorded by the history store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: i64,
    pub method: String,
    pub url: String,
    pub full_command: String,
    pub status_code: u16,
    pub response_body: String,
    /// Response headers encoded as a JSON object
    pub response_headers: String,
    pub response_type: ResponseType,
    pub request_size: i64,
    pub response_size: i64,
    pub created_at_ms: i64,
}
