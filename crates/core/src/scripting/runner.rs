//! Connection contract between the executor and a database driver.
//!
//! Defines [`Connector`] and [`StatementRunner`], the traits a driver
//! implements, along with [`RunnerError`].

use std::future::Future;
use std::time::Duration;

/// Boxed driver error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors reported by a driver for one connect or execute call.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The statement did not complete within its timeout.
    #[error("Statement timed out after {elapsed_ms}ms")]
    Timeout {
        /// Elapsed wall-clock time before the call was abandoned.
        elapsed_ms: u64,
    },

    /// Any error raised by the underlying driver.
    #[error("{0}")]
    Driver(#[source] BoxError),
}

impl RunnerError {
    pub fn driver(err: impl Into<BoxError>) -> Self {
        Self::Driver(err.into())
    }
}

/// An open connection able to run one statement at a time.
pub trait StatementRunner: Send {
    /// Execute `sql` and wait for completion, giving up after `timeout`.
    fn execute(
        &mut self,
        sql: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<(), RunnerError>> + Send;

    /// Release the connection. Consumes the runner so it can only happen once.
    fn close(self) -> impl Future<Output = ()> + Send
    where
        Self: Sized;
}

/// Opens connections for script runs.
pub trait Connector: Send + Sync {
    type Runner: StatementRunner;

    fn connect(&self) -> impl Future<Output = Result<Self::Runner, RunnerError>> + Send;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
