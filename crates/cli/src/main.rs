//! `sqlrun` -- run multi-statement SQL scripts against MySQL.
//!
//! Splits each script into statements (honoring quotes, comments and
//! `DELIMITER` directives) and executes them in order on one connection per
//! file.
//!
//! # Environment variables
//!
//! | Variable                        | Required | Default     | Description                     |
//! |---------------------------------|----------|-------------|---------------------------------|
//! | `SQLRUN_USER`                   | yes      | --          | Database username               |
//! | `SQLRUN_PASSWORD`               | yes      | --          | Database password               |
//! | `SQLRUN_HOST`                   | no       | `localhost` | Database host                   |
//! | `SQLRUN_PORT`                   | no       | `3306`      | Database port                   |
//! | `SQLRUN_DATABASE`               | no       | --          | Default schema                  |
//! | `SQLRUN_CONTINUE_ON_ERROR`      | no       | `true`      | Report failures instead of aborting |
//! | `SQLRUN_VERBOSITY`              | no       | `LOW`       | `NONE`, `LOW`, `MED`, `FULL`    |
//! | `SQLRUN_STATEMENT_TIMEOUT_SECS` | no       | `60`        | Per-statement timeout           |
//! | `SQLRUN_STATEMENT_DELAY_MS`     | no       | `40`        | Pause between statements        |

use std::process::ExitCode;

use clap::Parser;
use sqlrun_cli::args::Args;
use sqlrun_cli::batch::{self, EXIT_FATAL};
use sqlrun_core::config::ScriptConfig;
use sqlrun_core::error::ProcessError;
use sqlrun_core::scripting::processor::ScriptProcessor;
use sqlrun_db::MySqlConnector;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sqlrun_cli=info,sqlrun_core=info,sqlrun_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match ScriptConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %ProcessError::from(e), "Invalid configuration");
            return ExitCode::from(EXIT_FATAL);
        }
    };
    args.apply(&mut config);

    tracing::debug!(
        host = %config.connection.host,
        port = config.connection.port,
        files = args.files.len(),
        continue_on_error = config.continue_on_error,
        "Starting sqlrun",
    );

    let connector = MySqlConnector::new(&config.connection);
    let processor = ScriptProcessor::new(connector, config.execution_options());

    let summary = batch::run_files(&processor, &args.files).await;
    if summary.skipped > 0 {
        tracing::warn!(skipped = summary.skipped, "Remaining scripts were not run");
    }
    summary.exit_code()
}
