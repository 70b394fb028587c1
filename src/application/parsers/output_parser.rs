use crate::application::parsers::content_type::classify;
use crate::domain::entities::Response;
use crate::domain::value_objects::ResponseType;
use tracing::trace;

/// Prefix of the status line the instrumentation write-out appends
pub const STATUS_MARKER: &str = "HTTPSTATUS:";
pub const TIME_TOTAL_MARKER: &str = "time_total:";
pub const TIME_CONNECT_MARKER: &str = "time_connect:";
pub const TIME_STARTTRANSFER_MARKER: &str = "time_starttransfer:";

/// Reads the transfer tool's captured text back into a [`Response`].
///
/// Each step falls back on its own: no status leaves 0, no header lines
/// leave the mapping empty, a body that fails to parse as JSON is passed
/// through unformatted. Nothing here returns an error.
pub struct OutputParser;

impl OutputParser {
    pub fn parse(raw: &str) -> Response {
        let mut response = Response::default();
        Self::parse_into(raw, &mut response);
        response
    }

    /// Fills `response` from `raw`. The body already on `response` is kept
    /// when `raw` contains no body lines, and timing fields are only
    /// overwritten by markers actually present in `raw`.
    pub fn parse_into(raw: &str, response: &mut Response) {
        if let Some(status) = find_marker_status(raw).or_else(|| find_status_line(raw)) {
            response.status_code = status;
        }

        let normalized = strip_trailer(raw)
            .replace("\r\n", "\n")
            .replace('\r', "\n");
        let mut body_lines: Vec<&str> = Vec::new();
        let mut in_body = false;

        for line in normalized.split('\n') {
            let trimmed = line.trim();
            if line.starts_with(STATUS_MARKER) || status_line_code(trimmed).is_some() {
                continue;
            }
            if in_body {
                body_lines.push(line);
                continue;
            }
            let is_header =
                line.contains(':') && !trimmed.starts_with('{') && !trimmed.starts_with('[');
            if is_header {
                if let Some((key, value)) = line.split_once(':') {
                    response
                        .headers
                        .insert(key.trim().to_string(), value.trim().to_string());
                }
            } else if !trimmed.is_empty() {
                in_body = true;
                body_lines.push(line);
            }
        }

        if !body_lines.is_empty() {
            response.body = body_lines.join("\n");
        }

        response.response_type = classify(&response.headers, &response.body);
        response.formatted_body = match response.response_type {
            ResponseType::Json => format_json(&response.body),
            _ => response.body.clone(),
        };

        Self::refine_timing(raw, response);
        trace!(
            status = response.status_code,
            headers = response.headers.len(),
            body_len = response.body.len(),
            "parsed tool output"
        );
    }

    fn refine_timing(raw: &str, response: &mut Response) {
        let total = find_seconds(raw, TIME_TOTAL_MARKER);
        if let Some(total) = total {
            response.timing.total_time = total;
        }
        if let Some(connect) = find_seconds(raw, TIME_CONNECT_MARKER) {
            response.timing.connect_time = connect;
        }
        if let (Some(total), Some(start)) = (total, find_seconds(raw, TIME_STARTTRANSFER_MARKER)) {
            response.timing.transfer_time = (total - start).max(0.0);
        }
    }
}

/// Cuts the write-out trailer (the newline it prints plus the marker line)
/// off the end of `raw`, leaving the body exactly as the server sent it.
/// Text without a trailing marker line is returned unchanged.
pub fn strip_trailer(raw: &str) -> &str {
    let needle = format!("\n{STATUS_MARKER}");
    match raw.rfind(&needle) {
        Some(idx) if !raw[idx + 1..].trim_end_matches(['\r', '\n']).contains('\n') => &raw[..idx],
        _ => raw,
    }
}

/// Pretty-prints JSON with two-space indentation, returning the input
/// unchanged when it does not parse.
pub fn format_json(body: &str) -> String {
    if body.is_empty() {
        return String::new();
    }
    serde_json::from_str::<serde_json::Value>(body)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| body.to_string())
}

/// First `HTTPSTATUS:<digits>` occurrence.
fn find_marker_status(raw: &str) -> Option<u16> {
    raw.match_indices(STATUS_MARKER).find_map(|(idx, _)| {
        let rest = &raw[idx + STATUS_MARKER.len()..];
        leading_digits(rest).parse().ok()
    })
}

/// First `HTTP/<version> <code>` occurrence anywhere in the text.
fn find_status_line(raw: &str) -> Option<u16> {
    raw.match_indices("HTTP/")
        .find_map(|(idx, _)| status_line_code(&raw[idx..]))
}

/// Status code of a line shaped like `HTTP/1.1 200 OK` or `HTTP/2 404`.
fn status_line_code(line: &str) -> Option<u16> {
    let rest = line.strip_prefix("HTTP/")?;
    let version_len = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    if !rest.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let after_version = &rest[version_len..];
    let code_part = after_version.trim_start();
    if code_part.len() == after_version.len() {
        return None;
    }
    leading_digits(code_part).parse().ok()
}

/// Seconds following `marker`, allowing whitespace in between.
fn find_seconds(raw: &str, marker: &str) -> Option<f64> {
    raw.match_indices(marker).find_map(|(idx, _)| {
        let rest = raw[idx + marker.len()..].trim_start();
        let end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        rest[..end].parse().ok()
    })
}

fn leading_digits(s: &str) -> &str {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    &s[..end]
}
