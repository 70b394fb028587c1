//! cclearly: compose an HTTP request, run it through `curl`, and read the
//! result back.
//!
//! The core is a translation layer between three shapes of the same thing:
//! a pasted command line ([`CommandParser`]), the structured [`Request`] and
//! the tool's argument list ([`ArgumentBuilder`]), and the tool's raw output
//! turned back into a [`Response`] ([`OutputParser`]).

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use application::builders::argument_builder::ArgumentBuilder;
pub use application::parsers::command_parser::CommandParser;
pub use application::parsers::output_parser::OutputParser;
pub use application::parsers::tokenizer::tokenize;
pub use application::services::{HistoryStore, HttpRequestService, Transport};
pub use domain::entities::{HistoryItem, Request, Response};
pub use domain::errors::ServiceError;
pub use domain::value_objects::{Headers, ResponseType, Timing};
