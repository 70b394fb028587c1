use crate::application::parsers::tokenizer::tokenize;
use crate::domain::entities::Request;
use tracing::{debug, trace};

/// Flags that carry request data. Anything else is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flag {
    Method,
    Header,
    Data,
}

const SHORT_FLAGS: &[(&str, Flag)] = &[
    ("-X", Flag::Method),
    ("-H", Flag::Header),
    ("-d", Flag::Data),
];

const LONG_FLAGS: &[(&str, Flag)] = &[
    ("--request", Flag::Method),
    ("--header", Flag::Header),
    ("--data", Flag::Data),
    ("--data-raw", Flag::Data),
    ("--data-binary", Flag::Data),
    ("--data-ascii", Flag::Data),
    ("--data-urlencode", Flag::Data),
];

/// Turns a pasted `curl ...` invocation into a [`Request`].
///
/// Parsing never fails. Unknown options are skipped without consuming the
/// token after them, extra positional tokens after the URL are ignored, and
/// a command without a URL yields a request with an empty one.
pub struct CommandParser;

impl CommandParser {
    pub fn parse(command: &str) -> Request {
        let mut tokens = tokenize(command).into_iter().peekable();
        if tokens.next_if(|t| is_tool_name(t)).is_some() {
            trace!("dropped leading tool name");
        }

        let mut request = Request::default();
        while let Some(token) = tokens.next() {
            if let Some((flag, inline)) = recognize(&token) {
                let value = match inline {
                    Some(value) => value.to_string(),
                    None => match tokens.next() {
                        Some(value) => value,
                        None => {
                            debug!(flag = %token, "flag without a value at end of command");
                            break;
                        }
                    },
                };
                Self::apply(flag, &value, &mut request);
            } else if token.starts_with('-') {
                trace!(flag = %token, "skipping unrecognised flag");
            } else if request.url.is_empty() {
                request.url = strip_quotes(&token).to_string();
            }
        }
        request
    }

    fn apply(flag: Flag, value: &str, request: &mut Request) {
        match flag {
            Flag::Method => request.method = value.to_string(),
            Flag::Header => {
                let header = strip_quotes(value);
                match header.split_once(':') {
                    Some((key, value)) if !key.trim().is_empty() => {
                        request
                            .headers
                            .insert(key.trim().to_string(), value.trim().to_string());
                    }
                    _ => debug!(header, "ignoring malformed header"),
                }
            }
            Flag::Data => {
                request.body = strip_quotes(value).to_string();
                if request.is_get() {
                    request.method = "POST".to_string();
                }
            }
        }
    }
}

fn is_tool_name(token: &str) -> bool {
    token == "curl" || token == "curl.exe" || token.ends_with("/curl")
}

/// Matches a token against the known flags, returning any value attached
/// to it (`-XPOST`, `--request=PUT`).
fn recognize(token: &str) -> Option<(Flag, Option<&str>)> {
    if token.starts_with("--") {
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (token, None),
        };
        return LONG_FLAGS
            .iter()
            .find(|(long, _)| *long == name)
            .map(|(_, flag)| (*flag, inline));
    }
    SHORT_FLAGS.iter().find_map(|(short, flag)| {
        token
            .strip_prefix(short)
            .map(|rest| (*flag, (!rest.is_empty()).then_some(rest)))
    })
}

/// Removes one surrounding layer of matching quote characters.
fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_command() {
        let request = CommandParser::parse(concat!(
            r#"curl -X PUT -H "Content-Type: application/json" -H 'X-Trace:  abc ' "#,
            r#"-d '{"a":1}' https://api.example.com/items/1"#,
        ));
        assert_eq!(request.method, "PUT");
        assert_eq!(request.url, "https://api.example.com/items/1");
        assert_eq!(request.body, r#"{"a":1}"#);
        assert_eq!(request.headers.len(), 2);
        assert_eq!(request.headers["Content-Type"], "application/json");
        assert_eq!(request.headers["X-Trace"], "abc");
    }

    #[test]
    fn tool_name_is_optional() {
        let request = CommandParser::parse("https://example.com");
        assert_eq!(request.url, "https://example.com");
        assert_eq!(request.method, "GET");

        let request = CommandParser::parse("/usr/bin/curl https://example.com");
        assert_eq!(request.url, "https://example.com");
    }

    #[test]
    fn data_promotes_get_to_post_in_any_order() {
        assert_eq!(CommandParser::parse("curl -d x https://a").method, "POST");
        assert_eq!(CommandParser::parse("curl https://a --data-binary x").method, "POST");
        assert_eq!(CommandParser::parse("curl --data-raw x https://a").method, "POST");
    }

    #[test]
    fn explicit_method_is_kept_with_data() {
        assert_eq!(CommandParser::parse("curl -X PATCH -d x https://a").method, "PATCH");
        assert_eq!(CommandParser::parse("curl -d x -X DELETE https://a").method, "DELETE");
    }

    #[test]
    fn attached_flag_values_are_recognised() {
        let request =
            CommandParser::parse("curl -XDELETE --header=Accept:text/plain --data=hello https://a");
        assert_eq!(request.method, "DELETE");
        assert_eq!(request.headers["Accept"], "text/plain");
        assert_eq!(request.body, "hello");
    }

    #[test]
    fn repeated_header_key_keeps_last_value() {
        let request = CommandParser::parse("curl -H 'A: 1' -H 'A: 2' https://a");
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.headers["A"], "2");
    }

    #[test]
    fn header_value_keeps_later_colons() {
        let request = CommandParser::parse("curl -H 'Referer: https://x.test:8080/p' https://a");
        assert_eq!(request.headers["Referer"], "https://x.test:8080/p");
    }

    #[test]
    fn malformed_headers_are_ignored() {
        let request = CommandParser::parse("curl -H novalue -H ': empty key' https://a");
        assert!(request.headers.is_empty());
        assert_eq!(request.url, "https://a");
    }

    #[test]
    fn unknown_flags_do_not_consume_the_next_token() {
        let request = CommandParser::parse("curl -s --compressed -L https://a");
        assert_eq!(request.url, "https://a");

        // the unknown flag's argument is positional, so it claims the URL slot
        let request = CommandParser::parse("curl --max-time 5 https://a");
        assert_eq!(request.url, "5");
    }

    #[test]
    fn only_first_positional_becomes_url() {
        let request = CommandParser::parse("curl https://first https://second");
        assert_eq!(request.url, "https://first");
    }

    #[test]
    fn missing_url_yields_empty_url() {
        let request = CommandParser::parse("curl -X POST");
        assert_eq!(request.url, "");
        assert_eq!(request.method, "POST");
        assert_eq!(CommandParser::parse(""), Request::default());
    }

    #[test]
    fn trailing_flag_without_value_is_ignored() {
        let request = CommandParser::parse("curl https://a -H");
        assert_eq!(request.url, "https://a");
        assert!(request.headers.is_empty());
    }

    #[test]
    fn strip_quotes_removes_a_single_matching_layer() {
        assert_eq!(strip_quotes("\"'x'\""), "'x'");
        assert_eq!(strip_quotes("plain"), "plain");
        assert_eq!(strip_quotes("''"), "");
    }

    #[test]
    fn strip_quotes_keeps_unpaired_quotes() {
        assert_eq!(strip_quotes("\""), "\"");
        assert_eq!(strip_quotes("say \"hi\""), "say \"hi\"");
        assert_eq!(strip_quotes("\"abc"), "\"abc");
        assert_eq!(strip_quotes("'mixed\""), "'mixed\"");
    }

    #[test]
    fn values_ending_in_quotes_are_kept() {
        let request =
            CommandParser::parse(r#"curl -H 'If-None-Match: "abc"' -d 'say "hi"' https://a"#);
        assert_eq!(request.headers["If-None-Match"], "\"abc\"");
        assert_eq!(request.body, "say \"hi\"");
    }

    #[test]
    fn data_urlencode_is_a_data_flag() {
        let request = CommandParser::parse("curl --data-urlencode q=1 https://api.example.com");
        assert_eq!(request.url, "https://api.example.com");
        assert_eq!(request.method, "POST");
        assert_eq!(request.body, "q=1");
    }
}
