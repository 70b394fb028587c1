use crate::domain::entities::{DEFAULT_METHOD, Request};
use crate::domain::value_objects::Headers;
use anyhow::{Result, anyhow};

/// Assembles a [`Request`] from direct user input (CLI flags)
pub struct RequestBuilder {
    method: Option<String>,
    url: String,
    headers: Headers,
    body: String,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            url: String::new(),
            headers: Headers::new(),
            body: String::new(),
        }
    }

    pub fn method(mut self, method: Option<&str>) -> Result<Self> {
        if let Some(method) = method {
            let method = method.trim();
            if method.is_empty() || method.contains(char::is_whitespace) {
                return Err(anyhow!("Invalid HTTP method: '{}'", method));
            }
            self.method = Some(method.to_uppercase());
        }
        Ok(self)
    }

    pub fn url(mut self, raw_url: &str) -> Self {
        self.url = raw_url.trim().to_string();
        self
    }

    pub fn headers(mut self, raw_headers: &[String]) -> Result<Self> {
        for raw in raw_headers {
            match raw.split_once(':') {
                Some((key, value)) if !key.trim().is_empty() => {
                    self.headers
                        .insert(key.trim().to_string(), value.trim().to_string());
                }
                _ => {
                    return Err(anyhow!(
                        "Invalid header format: '{}'. Use 'Key: Value'",
                        raw
                    ));
                }
            }
        }
        Ok(self)
    }

    pub fn body(mut self, data: Option<&str>) -> Self {
        if let Some(data) = data {
            self.body = data.to_string();
        }
        self
    }

    /// A body without an explicit method sends as POST, like the tool does.
    pub fn build(self) -> Request {
        let method = match self.method {
            Some(method) => method,
            None if !self.body.is_empty() => "POST".to_string(),
            None => DEFAULT_METHOD.to_string(),
        };
        Request {
            method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_defaults() {
        let request = RequestBuilder::new().url(" https://a ").build();
        assert_eq!(request.method, "GET");
        assert_eq!(request.url, "https://a");
        assert!(request.headers.is_empty());
        assert!(!request.has_body());
    }

    #[test]
    fn body_without_method_becomes_post() {
        let request = RequestBuilder::new().url("https://a").body(Some("x")).build();
        assert_eq!(request.method, "POST");
    }

    #[test]
    fn explicit_method_is_uppercased_and_kept() {
        let request = RequestBuilder::new()
            .method(Some("put"))
            .unwrap()
            .body(Some("x"))
            .build();
        assert_eq!(request.method, "PUT");
    }

    #[test]
    fn rejects_headers_without_colon() {
        let err = RequestBuilder::new()
            .headers(&["NoColon".to_string()])
            .err()
            .unwrap();
        assert!(err.to_string().contains("Invalid header format"));
    }

    #[test]
    fn rejects_blank_method() {
        assert!(RequestBuilder::new().method(Some("  ")).is_err());
    }
}
