//! Content classification as an ordered rule table.
//!
//! Rules run top to bottom and the first one that returns a type wins. The
//! header rules come first, then structural sniffing of the body, then
//! prefix heuristics. Anything left over is `raw`.

use crate::domain::value_objects::{Headers, ResponseType};

pub type RuleFn = fn(Option<&str>, &str) -> Option<ResponseType>;

/// A named classification step. The first argument is the lowercased
/// `Content-Type` value when the header is present, the second the body.
pub struct ClassificationRule {
    pub name: &'static str,
    pub apply: RuleFn,
}

pub const RULES: &[ClassificationRule] = &[
    ClassificationRule { name: "header-json", apply: header_json },
    ClassificationRule { name: "header-html", apply: header_html },
    ClassificationRule { name: "header-raw", apply: header_raw },
    ClassificationRule { name: "empty-body", apply: empty_body },
    ClassificationRule { name: "json-body", apply: json_body },
    ClassificationRule { name: "html-prefix", apply: html_prefix },
];

pub fn classify(headers: &Headers, body: &str) -> ResponseType {
    let content_type = content_type(headers).map(str::to_lowercase);
    RULES
        .iter()
        .find_map(|rule| (rule.apply)(content_type.as_deref(), body))
        .unwrap_or_default()
}

/// Looks up `Content-Type` regardless of the case the server used.
pub fn content_type(headers: &Headers) -> Option<&str> {
    headers
        .get("Content-Type")
        .or_else(|| {
            headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case("content-type"))
                .map(|(_, value)| value)
        })
        .map(String::as_str)
}

fn header_json(content_type: Option<&str>, _body: &str) -> Option<ResponseType> {
    content_type
        .filter(|ct| ct.contains("application/json"))
        .map(|_| ResponseType::Json)
}

fn header_html(content_type: Option<&str>, _body: &str) -> Option<ResponseType> {
    content_type
        .filter(|ct| ct.contains("text/html") || ct.contains("application/xhtml"))
        .map(|_| ResponseType::Html)
}

fn header_raw(content_type: Option<&str>, _body: &str) -> Option<ResponseType> {
    content_type
        .filter(|ct| {
            ct.contains("text/plain") || ct.contains("text/xml") || ct.contains("application/xml")
        })
        .map(|_| ResponseType::Raw)
}

fn empty_body(_content_type: Option<&str>, body: &str) -> Option<ResponseType> {
    body.trim().is_empty().then_some(ResponseType::Raw)
}

fn json_body(_content_type: Option<&str>, body: &str) -> Option<ResponseType> {
    let body = body.trim();
    let delimited = (body.starts_with('{') && body.ends_with('}'))
        || (body.starts_with('[') && body.ends_with(']'));
    let parses = || serde_json::from_str::<serde_json::Value>(body).is_ok();
    (delimited && parses()).then_some(ResponseType::Json)
}

fn html_prefix(_content_type: Option<&str>, body: &str) -> Option<ResponseType> {
    let body = body.trim();
    ["<!DOCTYPE", "<html", "<HTML"]
        .iter()
        .any(|prefix| body.starts_with(*prefix))
        .then_some(ResponseType::Html)
}
