//! cm CLI - target a credential-manager API and run secret operations against it

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cm", author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get or set the targeted credential-manager API
    Api(ApiArgs),
}

#[derive(Debug, Args)]
struct ApiArgs {
    /// URL or host of the API to target; https is assumed without a scheme
    #[arg(value_name = "SERVER_URL")]
    server_url: Option<String>,
    /// URL or host of the API to target (the positional argument wins)
    #[arg(short, long, value_name = "SERVER_URL")]
    server: Option<String>,
}

// Conversion implementations

impl From<ApiArgs> for cm_commands::api::ApiArgs {
    fn from(args: ApiArgs) -> Self {
        Self {
            server_url: args.server_url,
            server_flag: args.server,
        }
    }
}

/// Help and usage errors go to stderr with a failing status; `--version` succeeds
fn report_parse_error(err: &clap::Error) -> ExitCode {
    if err.kind() == ErrorKind::DisplayVersion {
        print!("{err}");
        return ExitCode::SUCCESS;
    }

    eprint!("{err}");
    ExitCode::FAILURE
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return report_parse_error(&err),
    };

    let result = match cli.command {
        Commands::Api(args) => cm_commands::api::execute(args.into()).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
