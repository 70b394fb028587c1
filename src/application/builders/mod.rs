pub mod argument_builder;
pub mod request_builder;
