use crate::application::builders::argument_builder::ArgumentBuilder;
use crate::application::parsers::output_parser::{OutputParser, strip_trailer};
use crate::application::services::Transport;
use crate::domain::entities::{Request, Response};
use crate::infrastructure::config::Config;

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Extra wall-clock time granted on top of the tool's own `--max-time`
pub const DEFAULT_GRACE: Duration = Duration::from_secs(5);

/// Transport that shells out to `curl`.
///
/// Each call spawns its own process and shares nothing with other calls.
/// The call is bounded by the tool timeout plus a grace period; a process
/// still running after that is killed.
pub struct CurlExecutor {
    curl_path: PathBuf,
    arguments: ArgumentBuilder,
    grace: Duration,
}

/// What came back from one process run
struct Capture {
    stdout: String,
    stderr: String,
    /// Why the run counts as failed, if it does
    failure: Option<String>,
}

impl Capture {
    fn failed(description: String) -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            failure: Some(description),
        }
    }
}

impl CurlExecutor {
    pub fn new(curl_path: impl Into<PathBuf>, timeout_secs: u64) -> Self {
        Self {
            curl_path: curl_path.into(),
            arguments: ArgumentBuilder::new(timeout_secs),
            grace: DEFAULT_GRACE,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.curl_path.clone(), config.timeout_secs)
    }

    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    fn budget(&self) -> Duration {
        Duration::from_secs(self.arguments.max_time_secs()) + self.grace
    }

    async fn capture(&self, args: &[String]) -> Capture {
        let tool = self.curl_path.display();
        let mut command = Command::new(&self.curl_path);
        command.args(args).stdin(Stdio::null()).kill_on_drop(true);

        let output = match tokio::time::timeout(self.budget(), command.output()).await {
            Err(_) => {
                return Capture::failed(format!(
                    "{} did not finish within {}s",
                    tool,
                    self.budget().as_secs_f64()
                ));
            }
            Ok(Err(err)) => return Capture::failed(format!("failed to run {}: {}", tool, err)),
            Ok(Ok(output)) => output,
        };

        let failure = (!output.status.success()).then(|| match output.status.code() {
            Some(code) => format!("{} exited with status {}", tool, code),
            None => format!("{} was terminated by a signal", tool),
        });
        Capture {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            failure,
        }
    }
}

#[async_trait]
impl Transport for CurlExecutor {
    async fn execute(&self, request: &Request) -> Response {
        let args = self.arguments.build(request);
        debug!(tool = %self.curl_path.display(), ?args, "spawning transfer tool");

        let started = Instant::now();
        let capture = self.capture(&args).await;
        let elapsed = started.elapsed().as_secs_f64();

        let response = ResponseAdapter::to_domain_response(capture, elapsed);
        if response.is_failure() {
            warn!(url = %request.url, error = %response.error, "transfer failed");
        }
        info!(
            status = response.status_code,
            elapsed_ms = (elapsed * 1000.0).round() as u64,
            "transfer finished"
        );
        response
    }
}

/// Converts a process capture into the domain response
struct ResponseAdapter;

impl ResponseAdapter {
    fn to_domain_response(capture: Capture, elapsed: f64) -> Response {
        let mut response = Response::default();
        response.timing.total_time = elapsed;

        match capture.failure {
            None => OutputParser::parse_into(&capture.stdout, &mut response),
            Some(description) => {
                let stderr = capture.stderr.trim();
                response.error = if stderr.is_empty() {
                    description
                } else {
                    stderr.to_string()
                };
                response.body = strip_trailer(&capture.stdout).to_string();
                OutputParser::parse_into(&capture.stderr, &mut response);
            }
        }
        response
    }
}
