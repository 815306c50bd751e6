//! eirene: console client for the Eirene counseling chat server.
//!
//! Opens a session, waits for the server to report it ready, then reads
//! questions from stdin and streams each reply to stdout until an empty
//! line is entered. The session is ended on the way out.

mod console;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use eirene_client::{ChatClient, ClientConfig};
use eirene_common::UserId;
use eirene_config::{toml_loader, validation, EireneConfig};

use crate::console::ConsoleOptions;

#[derive(Parser)]
#[command(name = "eirene", about = "Console client for the Eirene chat server")]
struct Args {
    /// Chat server base URL (overrides config and EIRENE_SERVER_URL).
    #[arg(long)]
    server: Option<String>,

    /// User ID to start the session with. Prompted for when omitted.
    #[arg(short, long)]
    user: Option<String>,

    /// Config file to use instead of the platform default.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How many times to check whether the new session is ready.
    #[arg(long)]
    max_checks: Option<u32>,

    /// Seconds to wait between readiness checks.
    #[arg(long)]
    check_interval: Option<u32>,

    /// Print the resolved configuration as JSON and exit.
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let logging = logging::init();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("eirene: {e}");
            return ExitCode::FAILURE;
        }
    };

    if args.print_config {
        println!("{}", eirene_config::config_to_json(&config));
        return ExitCode::SUCCESS;
    }

    logging.apply_level(config.logging.level);

    match run(&args, &config).await {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            tracing::error!(error = %e, "eirene session failed");
            ExitCode::FAILURE
        }
    }
}

/// Resolve config: file, then environment, then command-line flags.
fn load_config(args: &Args) -> eirene_common::Result<EireneConfig> {
    let mut config = match &args.config {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    eirene_config::apply_env_overrides(&mut config);

    if let Some(server) = &args.server {
        config.server.base_url = server.clone();
    }
    if let Some(max_checks) = args.max_checks {
        config.session.max_check_attempts = max_checks;
    }
    if let Some(interval) = args.check_interval {
        config.session.check_interval = interval;
    }

    validation::validate(&config)?;
    Ok(config)
}

async fn run(args: &Args, config: &EireneConfig) -> eirene_common::Result<console::Outcome> {
    let mut client_config = ClientConfig::new(config.server.base_url.clone());
    if let Some(timeout) = config.server.connect_timeout_duration() {
        client_config = client_config.with_connect_timeout(timeout);
    }
    if let Some(timeout) = config.server.request_timeout_duration() {
        client_config = client_config.with_request_timeout(timeout);
    }
    let client = ChatClient::new(client_config)?;
    tracing::debug!(base_url = %client.config().base_url, "chat client ready");

    let options = ConsoleOptions {
        user_id: args.user.clone().map(UserId::from),
        max_check_attempts: config.session.max_check_attempts,
        check_interval: Duration::from_secs(u64::from(config.session.check_interval)),
    };

    let mut input = std::io::stdin().lock();
    let mut output = std::io::stdout();
    console::run(&client, &options, &mut input, &mut output).await
}
