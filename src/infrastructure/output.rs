use crate::domain::entities::{HistoryItem, Request, Response};
use crate::domain::value_objects::ResponseType;
use anyhow::{Result, anyhow};
use colored::{Color, Colorize};
use std::collections::BTreeMap;

pub fn status_text(status: u16) -> &'static str {
    match status {
        200..=299 => "Success",
        300..=399 => "Redirect",
        400..=499 => "Client Error",
        500.. => "Server Error",
        _ => "Unknown",
    }
}

pub fn status_color(status: u16) -> Color {
    match status {
        200..=299 => Color::Green,
        300..=399 => Color::Cyan,
        400..=499 => Color::Yellow,
        500.. => Color::Red,
        _ => Color::BrightBlack,
    }
}

pub fn print_response(response: &Response, verbose: bool) {
    let status = format!(
        "{} {}",
        response.status_code,
        status_text(response.status_code)
    );
    println!(
        "{}  {}",
        status.color(status_color(response.status_code)).bold(),
        format!(
            "{:.0} ms · {}",
            response.timing.total_time * 1000.0,
            response.response_type
        )
        .dimmed()
    );

    if verbose {
        if response.timing.connect_time > 0.0 {
            println!(
                "{}",
                format!(
                    "connect {:.0} ms · transfer {:.0} ms",
                    response.timing.connect_time * 1000.0,
                    response.timing.transfer_time * 1000.0
                )
                .dimmed()
            );
        }
        let headers: BTreeMap<_, _> = response.headers.iter().collect();
        for (key, value) in headers {
            println!("{}: {}", key.cyan(), value);
        }
        println!();
    }

    if response.is_failure() {
        eprintln!("{}", response.error.red());
    }
    print_response_body(response);
}

pub fn print_response_body(response: &Response) {
    let body = &response.formatted_body;
    if body.is_empty() {
        return;
    }
    match response.response_type {
        ResponseType::Json => println!("{}", body.green()),
        ResponseType::Html => println!("{}", body.white()),
        ResponseType::Raw => println!("{}", body),
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let pretty =
        serde_json::to_string_pretty(value).map_err(|e| anyhow!("Failed to format JSON: {}", e))?;
    println!("{}", pretty);
    Ok(())
}

pub fn print_request(request: &Request, command: &str) {
    println!("{} {}", request.method.bold(), request.url);
    let headers: BTreeMap<_, _> = request.headers.iter().collect();
    for (key, value) in headers {
        println!("{}: {}", key.cyan(), value);
    }
    if request.has_body() {
        println!();
        println!("{}", request.body);
    }
    println!();
    println!("{}", command.dimmed());
}

pub fn print_history(items: &[HistoryItem]) {
    if items.is_empty() {
        println!("{}", "No history yet.".dimmed());
        return;
    }
    for item in items {
        println!(
            "{:>5}  {}  {:<7} {}",
            item.id.to_string().dimmed(),
            item.status_code.to_string().color(status_color(item.status_code)),
            item.method,
            item.url
        );
    }
}

pub fn print_history_item(item: &HistoryItem) {
    println!(
        "{} {}  {}",
        format!("#{}", item.id).dimmed(),
        item.method.bold(),
        item.url
    );
    println!("{}", item.full_command.dimmed());
    println!(
        "{}",
        format!(
            "request {} B · response {} B",
            item.request_size, item.response_size
        )
        .dimmed()
    );
}
