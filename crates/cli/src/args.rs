//! Command-line arguments.
//!
//! Connection settings come from the environment only; the flags here
//! override the execution settings for a single invocation.

use std::time::Duration;

use clap::Parser;
use sqlrun_core::config::{ScriptConfig, Verbosity};

#[derive(Debug, Parser)]
#[command(name = "sqlrun", version)]
#[command(about = "Run multi-statement SQL scripts against a MySQL database")]
#[command(long_about = "Run multi-statement SQL scripts against a MySQL database.

Scripts are split on `;` (or the delimiter set by a DELIMITER directive) and
their statements run one by one, in order, on a single connection per file.

CONNECTION (environment or .env):
  SQLRUN_USER, SQLRUN_PASSWORD     required
  SQLRUN_HOST                      default localhost
  SQLRUN_PORT                      default 3306
  SQLRUN_DATABASE                  optional

EXAMPLES:
  sqlrun schema.sql seed.sql
  sqlrun --verbosity FULL --abort-on-error migrate.sql
  cat dump.sql | sqlrun -")]
pub struct Args {
    /// SQL script files to run, in order (`-` reads standard input)
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<String>,

    /// Progress output: NONE, LOW, MED (M) or FULL (F)
    #[arg(short, long, value_name = "LEVEL")]
    pub verbosity: Option<String>,

    /// Treat a failing statement as fatal and skip all remaining files
    #[arg(long)]
    pub abort_on_error: bool,

    /// Per-statement timeout in seconds (at least 1)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub statement_timeout_secs: Option<u64>,

    /// Pause between statements in milliseconds (0 disables)
    #[arg(long, value_name = "MS")]
    pub statement_delay_ms: Option<u64>,
}

impl Args {
    /// Apply command-line overrides on top of the environment config.
    pub fn apply(&self, config: &mut ScriptConfig) {
        if let Some(level) = &self.verbosity {
            config.verbosity = Verbosity::parse(level);
        }
        if self.abort_on_error {
            config.continue_on_error = false;
        }
        if let Some(secs) = self.statement_timeout_secs {
            config.statement_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = self.statement_delay_ms {
            config.statement_delay = Duration::from_millis(ms);
        }
    }
}
