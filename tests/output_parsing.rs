use cclearly::application::parsers::output_parser::format_json;
use cclearly::{Headers, OutputParser, ResponseType};

#[test]
fn marker_header_and_json_body() {
    let response =
        OutputParser::parse("HTTPSTATUS:200\nContent-Type: application/json\n\n{\"a\":1}");
    assert_eq!(response.status_code, 200);
    assert_eq!(
        response.headers,
        Headers::from([("Content-Type".to_string(), "application/json".to_string())])
    );
    assert_eq!(response.body, "{\"a\":1}");
    assert_eq!(response.response_type, ResponseType::Json);
    assert_eq!(response.formatted_body, "{\n  \"a\": 1\n}");
}

#[test]
fn html_and_plain_bodies_are_sniffed() {
    let html = OutputParser::parse("HTTPSTATUS:200\n\n<!DOCTYPE html><html></html>");
    assert_eq!(html.response_type, ResponseType::Html);
    assert_eq!(html.formatted_body, html.body);

    let plain = OutputParser::parse("HTTPSTATUS:200\n\nplain text");
    assert_eq!(plain.response_type, ResponseType::Raw);
    assert_eq!(plain.body, "plain text");
}

#[test]
fn formatting_twice_is_stable() {
    let once = format_json(r#"[{"z":1,"a":[true,null,"s"]},2.5]"#);
    assert_eq!(format_json(&once), once);
}

#[test]
fn empty_output_is_harmless() {
    let response = OutputParser::parse("");
    assert_eq!(response.status_code, 0);
    assert!(response.headers.is_empty());
    assert_eq!(response.body, "");
    assert_eq!(response.response_type, ResponseType::Raw);
}

#[test]
fn http2_output_with_lowercase_headers() {
    let raw = concat!(
        "HTTP/2 404\r\n",
        "content-type: application/json\r\n",
        "date: Tue, 01 Jan 2030 00:00:00 GMT\r\n",
        "\r\n",
        "{\"error\":\"missing\"}",
        "\nHTTPSTATUS:404 time_connect:0.002 time_starttransfer:0.004 time_total:0.010\n",
    );
    let response = OutputParser::parse(raw);
    assert_eq!(response.status_code, 404);
    assert_eq!(response.headers["date"], "Tue, 01 Jan 2030 00:00:00 GMT");
    assert_eq!(response.response_type, ResponseType::Json);
    assert_eq!(response.timing.total_time, 0.010);
    assert_eq!(response.timing.connect_time, 0.002);
}

#[test]
fn garbage_never_panics() {
    let inputs = [
        "\r\r\n\n",
        "HTTPSTATUS:",
        "HTTPSTATUS:99999999",
        "HTTP/",
        ":::",
        "{",
        "time_total:abc",
    ];
    for raw in inputs {
        let response = OutputParser::parse(raw);
        assert_eq!(response.status_code, 0, "{raw:?}");
    }
}
