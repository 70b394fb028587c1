use cclearly::application::services::HttpRequestService;
use cclearly::infrastructure::config::Config;
use cclearly::infrastructure::curl_executor::CurlExecutor;
use cclearly::infrastructure::history_store::SqliteHistoryStore;
use cclearly::presentation::cli::Cli;
use clap::Parser;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// cclearly: paste a curl command, see a clear response
///
/// Requests run through the system `curl` binary. Every execution is recorded
/// in a local SQLite history so it can be listed and replayed later.
#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(1);
        }
    };
    let request_service = build_service(&config);

    let result = cli.run(&request_service).await;
    request_service.close().await;

    if let Err(err) = result {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .try_init()
        .ok();
}

/// Composition root. A history store that fails to open only disables
/// history; requests still run.
fn build_service(config: &Config) -> HttpRequestService {
    let service = HttpRequestService::new(Box::new(CurlExecutor::from_config(config)));
    if !config.history_enabled {
        return service;
    }
    match SqliteHistoryStore::open(config.history_path()) {
        Ok(store) => service.with_history(Arc::new(store)),
        Err(err) => {
            warn!(error = %format!("{err:#}"), "history disabled");
            service
        }
    }
}
