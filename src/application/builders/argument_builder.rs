use crate::application::parsers::output_parser::{
    STATUS_MARKER, TIME_CONNECT_MARKER, TIME_STARTTRANSFER_MARKER, TIME_TOTAL_MARKER,
};
use crate::domain::entities::Request;
use std::collections::BTreeMap;

pub const DEFAULT_MAX_TIME_SECS: u64 = 30;
pub const TOOL_NAME: &str = "curl";

/// Builds the argument list handed to the transfer tool, and the
/// human-facing command line that reproduces a request.
#[derive(Debug, Clone)]
pub struct ArgumentBuilder {
    max_time_secs: u64,
}

impl Default for ArgumentBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TIME_SECS)
    }
}

impl ArgumentBuilder {
    pub fn new(max_time_secs: u64) -> Self {
        Self { max_time_secs }
    }

    pub fn max_time_secs(&self) -> u64 {
        self.max_time_secs
    }

    /// Trailer the tool prints after the body. It is a single line starting
    /// with the status marker, so the output parser drops it from the body
    /// while still finding the timing markers in it.
    pub fn write_out() -> String {
        format!(
            "\n{STATUS_MARKER}%{{http_code}} \
             {TIME_CONNECT_MARKER}%{{time_connect}} \
             {TIME_STARTTRANSFER_MARKER}%{{time_starttransfer}} \
             {TIME_TOTAL_MARKER}%{{time_total}}\n"
        )
    }

    /// Instrumentation flags first, then the request itself with the URL last.
    pub fn build(&self, request: &Request) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-s".into(),
            "-w".into(),
            Self::write_out(),
            "-D".into(),
            "-".into(),
            "--max-time".into(),
            self.max_time_secs.to_string(),
            "--compressed".into(),
            "-H".into(),
            "Cache-Control: no-cache".into(),
            "-H".into(),
            "Pragma: no-cache".into(),
        ];
        args.extend(Self::request_args(request, |value| value.to_string()));
        args
    }

    /// Command line a user can paste back into a shell or into
    /// `CommandParser::parse`. Instrumentation flags are left out.
    pub fn command_line(request: &Request) -> String {
        let mut parts = vec![TOOL_NAME.to_string()];
        parts.extend(Self::request_args(request, shell_quote));
        parts.join(" ")
    }

    fn request_args(request: &Request, quote: impl Fn(&str) -> String) -> Vec<String> {
        let mut args = Vec::new();
        if !request.is_get() {
            args.push("-X".to_string());
            args.push(quote(&request.method));
        }
        let headers: BTreeMap<_, _> = request.headers.iter().collect();
        for (key, value) in headers {
            args.push("-H".to_string());
            args.push(quote(&format!("{key}: {value}")));
        }
        if request.has_body() && !request.is_get() {
            args.push("-d".to_string());
            args.push(quote(&request.body));
        }
        args.push(quote(&request.url));
        args
    }
}

/// Single-quotes a value. An embedded `'` closes the quote, is emitted as
/// `"'"` and reopens it; adjacent segments join back into one token.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r#"'"'"'"#))
}
