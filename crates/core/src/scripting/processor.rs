//! Per-script pipeline.
//!
//! [`ScriptProcessor`] owns a [`Connector`] and the execution options, and
//! runs one script at a time through the full lifecycle:
//! 1. Decode and split the script into statements.
//! 2. Open a connection.
//! 3. Execute the statements in order.
//! 4. Close the connection, whatever the outcome.
//! 5. Hand the source back on success, or a [`ProcessError`] on failure.

use std::borrow::Cow;

use crate::config::Verbosity;
use crate::error::ProcessError;
use crate::scanner::scan;

use super::executor::{execute_commands, ExecutionOptions, ExecutionOutcome, StatementFailure};
use super::runner::{Connector, StatementRunner};

/// A script to run, as read from disk or stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSource {
    /// Logical name used in logs and error messages (usually the file path).
    pub name: Option<String>,
    pub contents: Vec<u8>,
}

impl ScriptSource {
    pub fn new(name: Option<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name,
            contents: contents.into(),
        }
    }

    /// Contents decoded as UTF-8; invalid sequences become U+FFFD.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.contents)
    }
}

/// Result of a fully successful script run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptReport {
    /// The input, unchanged.
    pub source: ScriptSource,
    pub statements_executed: usize,
}

/// Runs scripts against connections obtained from `C`.
pub struct ScriptProcessor<C> {
    connector: C,
    options: ExecutionOptions,
}

impl<C: Connector> ScriptProcessor<C> {
    pub fn new(connector: C, options: ExecutionOptions) -> Self {
        Self { connector, options }
    }

    /// Run one script on a fresh connection.
    ///
    /// The connection is closed exactly once before this returns, including
    /// when the run is aborted. Whether an error should end the host program
    /// is left to the caller ([`ProcessError::is_fatal`]).
    pub async fn process(&self, source: ScriptSource) -> Result<ScriptReport, ProcessError> {
        let verbosity = self.options.verbosity;

        let commands = scan(&source.text()).map_err(|e| ProcessError::Scan {
            script: source.name.clone(),
            source: e,
        })?;

        if verbosity == Verbosity::Full {
            tracing::info!("Connecting to the database");
        }
        let mut runner = self
            .connector
            .connect()
            .await
            .map_err(ProcessError::Connection)?;
        if verbosity == Verbosity::Full {
            tracing::info!("Connection to the database established");
        }

        if verbosity >= Verbosity::Low {
            match &source.name {
                Some(name) => {
                    tracing::info!(script = %name, statements = commands.len(), "Processing script")
                }
                None => tracing::info!(statements = commands.len(), "Processing an SQL script"),
            }
        }

        let outcome =
            execute_commands(source.name.as_deref(), &commands, &mut runner, &self.options).await;

        if verbosity == Verbosity::Full {
            tracing::info!("Closing the database connection");
        }
        runner.close().await;

        match outcome {
            ExecutionOutcome::AllSucceeded { count } => Ok(ScriptReport {
                source,
                statements_executed: count,
            }),
            ExecutionOutcome::FailedAt(failure) => Err(statement_error(source, failure, false)),
            ExecutionOutcome::Aborted(failure) => Err(statement_error(source, failure, true)),
        }
    }
}

fn statement_error(source: ScriptSource, failure: StatementFailure, aborted: bool) -> ProcessError {
    ProcessError::Statement {
        script: source.name,
        index: failure.index,
        line: failure.line,
        statement: failure.statement,
        aborted,
        source: failure.error,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
