pub mod config;
pub mod curl_executor;
pub mod history_store;
pub mod output;
