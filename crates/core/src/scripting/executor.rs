//! Sequential statement execution.
//!
//! [`execute_commands`] runs a [`CommandBuffer`] one statement at a time on a
//! single [`StatementRunner`]. The first failure ends the run; the
//! continue-on-error policy only decides how that failure is classified.

use std::time::{Duration, Instant};

use crate::config::{Verbosity, DEFAULT_STATEMENT_DELAY, DEFAULT_STATEMENT_TIMEOUT};
use crate::scanner::CommandBuffer;

use super::runner::{RunnerError, StatementRunner};

/// Name used in logs for scripts without one.
pub const UNNAMED_SCRIPT: &str = "<sql script>";

/// Settings for one execution run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Report a failure as [`ExecutionOutcome::FailedAt`] instead of
    /// [`ExecutionOutcome::Aborted`].
    pub continue_on_error: bool,
    pub verbosity: Verbosity,
    /// Maximum time a single statement may take.
    pub statement_timeout: Duration,
    /// Pause after each successful statement before the next one starts.
    /// Zero disables pacing.
    pub statement_delay: Duration,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            continue_on_error: true,
            verbosity: Verbosity::default(),
            statement_timeout: DEFAULT_STATEMENT_TIMEOUT,
            statement_delay: DEFAULT_STATEMENT_DELAY,
        }
    }
}

/// The statement that stopped a run.
#[derive(Debug)]
pub struct StatementFailure {
    /// 0-based position in the command buffer.
    pub index: usize,
    pub line: usize,
    pub statement: String,
    pub error: RunnerError,
}

/// Terminal result of running a command buffer.
#[derive(Debug)]
pub enum ExecutionOutcome {
    AllSucceeded { count: usize },
    /// A statement failed under continue-on-error.
    FailedAt(StatementFailure),
    /// A statement failed with continue-on-error off. The caller should
    /// release the connection and stop all further work.
    Aborted(StatementFailure),
}

impl ExecutionOutcome {
    /// Number of statements that completed successfully.
    pub fn executed(&self) -> usize {
        match self {
            Self::AllSucceeded { count } => *count,
            Self::FailedAt(failure) | Self::Aborted(failure) => failure.index,
        }
    }
}

/// Run every statement in `commands`, in order, on `runner`.
///
/// `script` is only used for log output.
pub async fn execute_commands<R: StatementRunner>(
    script: Option<&str>,
    commands: &CommandBuffer,
    runner: &mut R,
    options: &ExecutionOptions,
) -> ExecutionOutcome {
    if commands.is_empty() {
        return ExecutionOutcome::AllSucceeded { count: 0 };
    }

    let script = script.unwrap_or(UNNAMED_SCRIPT);
    let total = commands.len();

    for (index, statement) in commands.iter().enumerate() {
        let query = index + 1;

        if options.verbosity == Verbosity::Full {
            tracing::info!(script, query, line = statement.line, sql = %statement.text, "Executing query");
        } else if options.verbosity >= Verbosity::Med {
            tracing::info!(script, query, "Executing query");
        }

        let start = Instant::now();
        match runner.execute(&statement.text, options.statement_timeout).await {
            Ok(()) => {
                if options.verbosity == Verbosity::Full {
                    let elapsed_ms = start.elapsed().as_millis() as u64;
                    tracing::info!(script, query, elapsed_ms, "Successfully executed query");
                }
                if query < total && !options.statement_delay.is_zero() {
                    tokio::time::sleep(options.statement_delay).await;
                }
            }
            Err(error) => {
                if options.verbosity > Verbosity::Silent {
                    tracing::warn!(script, query, line = statement.line, error = %error, "Failed to execute query");
                }
                let failure = StatementFailure {
                    index,
                    line: statement.line,
                    statement: statement.text.clone(),
                    error,
                };
                return if options.continue_on_error {
                    ExecutionOutcome::FailedAt(failure)
                } else {
                    ExecutionOutcome::Aborted(failure)
                };
            }
        }
    }

    if options.verbosity == Verbosity::Full {
        tracing::info!(script, count = total, "Executed all queries");
    }
    ExecutionOutcome::AllSucceeded { count: total }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
