use crate::application::builders::argument_builder::shell_quote;
use crate::application::builders::request_builder::RequestBuilder;
use crate::application::services::HttpRequestService;
use crate::domain::entities::{Request, Response};
use crate::infrastructure::config::Config;
use crate::infrastructure::output;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

/// CLI configuration for cclearly
#[derive(Parser, Debug)]
#[command(name = "cclearly", version)]
#[command(about = "cclearly: compose, run and replay curl requests", long_about = None)]
pub struct Cli {
    /// Show response headers and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON profile to load instead of <data dir>/config.json
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Do not record or read request history
    #[arg(long, global = true)]
    pub no_history: bool,

    /// Transfer timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Path of the curl binary
    #[arg(long, global = true)]
    pub curl: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a request built from flags
    Send(SendArgs),
    /// Execute a pasted curl command
    Run {
        #[command(flatten)]
        command: CommandArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Show how a curl command is understood, without running it
    Parse {
        #[command(flatten)]
        command: CommandArgs,
    },
    /// List recent requests
    History {
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },
    /// Show a recorded request and its response
    Show {
        id: i64,
        #[arg(long)]
        json: bool,
    },
    /// Check that the history store is usable
    Doctor,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    pub url: String,

    #[arg(short = 'X', long = "request")]
    pub method: Option<String>,

    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    #[arg(short = 'd', long = "data")]
    pub body: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct CommandArgs {
    /// The command, either as one quoted string or as separate arguments after `--`
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl CommandArgs {
    /// A single argument is taken as pasted text; several are re-quoted so
    /// their boundaries survive tokenizing.
    pub fn to_command_string(&self) -> String {
        match self.command.as_slice() {
            [single] => single.clone(),
            many => many
                .iter()
                .map(|arg| shell_quote(arg))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Write the response body to a file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the whole response as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Loads configuration and applies the flags on top of it.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(curl) = &self.curl {
            config.curl_path = curl.clone();
        }
        if self.no_history {
            config.history_enabled = false;
        }
        Ok(config)
    }

    pub async fn run(&self, request_service: &HttpRequestService) -> Result<()> {
        match &self.command {
            Commands::Send(args) => {
                let request = RequestBuilder::new()
                    .method(args.method.as_deref())?
                    .url(&args.url)
                    .headers(&args.headers)?
                    .body(args.body.as_deref())
                    .build();
                self.execute(request_service, request, &args.output).await
            }
            Commands::Run { command, output: out } => {
                let request = request_service.parse_command(&command.to_command_string());
                if request.url.is_empty() {
                    println!("{}", "No URL found in command.".yellow());
                    return Ok(());
                }
                self.execute(request_service, request, out).await
            }
            Commands::Parse { command } => {
                let request = request_service.parse_command(&command.to_command_string());
                let line = request_service.command_line(&request);
                if self.verbose {
                    output::print_request(&request, &line);
                } else {
                    output::print_json(&request)?;
                    println!("{}", line.dimmed());
                }
                Ok(())
            }
            Commands::History { limit } => {
                let items = request_service.history(*limit)?;
                output::print_history(&items);
                Ok(())
            }
            Commands::Show { id, json } => {
                let item = request_service.request_by_id(*id)?;
                let response = request_service.response_by_id(*id)?;
                if *json {
                    output::print_json(&item)?;
                } else {
                    output::print_history_item(&item);
                    output::print_response(&response, self.verbose);
                }
                Ok(())
            }
            Commands::Doctor => {
                let (ok, message) = request_service.check_history();
                if ok {
                    println!("{}", message.green());
                } else {
                    println!("{}", message.yellow());
                }
                Ok(())
            }
        }
    }

    async fn execute(
        &self,
        request_service: &HttpRequestService,
        request: Request,
        out: &OutputArgs,
    ) -> Result<()> {
        let response = request_service.execute(request).await;

        if out.json {
            return output::print_json(&response);
        }

        match &out.output {
            Some(path) => {
                std::fs::write(path, &response.body)
                    .with_context(|| format!("write response to {}", path.display()))?;
                output::print_response(
                    &Response {
                        formatted_body: String::new(),
                        ..response
                    },
                    self.verbose,
                );
                println!("Saved response to {}", path.display());
            }
            None => output::print_response(&response, self.verbose),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_command_argument_is_used_verbatim() {
        let cli = Cli::parse_from(["cclearly", "parse", "curl -H 'A: b' https://a"]);
        let Commands::Parse { command } = cli.command else {
            panic!("expected parse");
        };
        assert_eq!(command.to_command_string(), "curl -H 'A: b' https://a");
    }

    #[test]
    fn split_command_arguments_are_requoted() {
        let cli = Cli::parse_from(["cclearly", "run", "--", "curl", "-H", "A: b", "https://a"]);
        let Commands::Run { command, .. } = cli.command else {
            panic!("expected run");
        };
        assert_eq!(command.to_command_string(), "'curl' '-H' 'A: b' 'https://a'");
    }

    #[test]
    fn send_accepts_curl_style_flags() {
        let cli = Cli::parse_from([
            "cclearly", "send", "-X", "PUT", "-H", "A: b", "-d", "x", "https://a", "--json",
        ]);
        let Commands::Send(args) = cli.command else {
            panic!("expected send");
        };
        assert_eq!(args.method.as_deref(), Some("PUT"));
        assert_eq!(args.headers, vec!["A: b"]);
        assert_eq!(args.body.as_deref(), Some("x"));
        assert!(args.output.json);
    }

    #[test]
    fn global_flags_override_profile() {
        let dir = tempfile::tempdir().unwrap();
        let profile = dir.path().join("profile.json");
        std::fs::write(&profile, r#"{"timeout_secs": 60, "history_enabled": true}"#).unwrap();
        let profile = profile.to_str().unwrap();

        let cli = Cli::parse_from([
            "cclearly", "--config", profile, "--timeout", "3", "--curl", "/bin/curl",
            "--no-history", "doctor",
        ]);
        let config = cli.load_config().unwrap();
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.curl_path, PathBuf::from("/bin/curl"));
        assert!(!config.history_enabled);
    }
}
