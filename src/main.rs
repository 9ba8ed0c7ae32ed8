//! qdb - remote debugger REPL client.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

use qdb::client::run_session;
use qdb::config::{ConfigLoader, QdbConfig};
use qdb::display;

#[derive(Parser)]
#[command(
    name = "qdb",
    about = "REPL client for a remote qdb debug session",
    version
)]
struct Cli {
    /// WebSocket address format string containing {uuid}.
    #[arg(short = 'w', long, value_name = "ADDR-FMT")]
    ws_address: Option<String>,

    /// Session uuid to connect to.
    #[arg(short, long, value_name = "UUID")]
    uuid: Option<String>,

    /// Generate a fresh random session uuid.
    #[arg(long, conflicts_with = "uuid")]
    new_uuid: bool,

    /// Authentication message sent with the start event.
    #[arg(short, long, value_name = "AUTH-MSG")]
    auth_msg: Option<String>,

    /// Config file (defaults to .qdb.toml, then ~/.config/qdb/config.toml).
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Keep the trace file after the session ends.
    #[arg(long)]
    keep_trace: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn apply(self, mut config: QdbConfig) -> QdbConfig {
        if let Some(ws_address) = self.ws_address {
            config.ws_address = ws_address;
        }
        if self.new_uuid {
            config.uuid = Uuid::new_v4().to_string();
        } else if let Some(uuid) = self.uuid {
            config.uuid = uuid;
        }
        if let Some(auth_msg) = self.auth_msg {
            config.auth_msg = auth_msg;
        }
        config.keep_trace |= self.keep_trace;
        config
    }
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let loader = cli
        .config
        .clone()
        .map_or_else(ConfigLoader::new, ConfigLoader::with_path);
    let config = match loader.load() {
        Ok(config) => cli.apply(config),
        Err(e) => {
            display::print_error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        address = %config.ws_address,
        uuid = %config.uuid,
        "Starting qdb session"
    );

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    match run_session(&config, stdin).await {
        Ok(report) => {
            tracing::info!(
                mode = %report.mode,
                commands = report.commands_sent,
                "Session finished"
            );
            display::print_session_end(&report.dispatch);
            ExitCode::SUCCESS
        }
        Err(e) => {
            display::print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
