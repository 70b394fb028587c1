pub mod command_parser;
pub mod content_type;
pub mod output_parser;
pub mod tokenizer;
