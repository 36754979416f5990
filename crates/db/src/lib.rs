//! MySQL driver for `sqlrun-core`, built on `sqlx`.
//!
//! Each script run gets its own [`MySqlConnection`]; statements are sent
//! over the text protocol (`sqlx::raw_sql`) so that statements the server
//! cannot prepare, such as `CREATE PROCEDURE` or `DELIMITER`-style bodies,
//! still run.

use std::time::{Duration, Instant};

use sqlrun_core::config::ConnectionConfig;
use sqlrun_core::scripting::runner::{Connector, RunnerError, StatementRunner};
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection, Executor};

/// Build `sqlx` connect options from a [`ConnectionConfig`].
pub fn connect_options(config: &ConnectionConfig) -> MySqlConnectOptions {
    let options = MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.username)
        .password(&config.password);

    match &config.database {
        Some(database) => options.database(database),
        None => options,
    }
}

/// Opens one MySQL connection per script.
#[derive(Clone)]
pub struct MySqlConnector {
    options: MySqlConnectOptions,
}

impl MySqlConnector {
    pub fn new(config: &ConnectionConfig) -> Self {
        Self::from_options(connect_options(config))
    }

    pub fn from_options(options: MySqlConnectOptions) -> Self {
        Self { options }
    }
}

impl Connector for MySqlConnector {
    type Runner = MySqlRunner;

    async fn connect(&self) -> Result<MySqlRunner, RunnerError> {
        let conn = self.options.connect().await.map_err(RunnerError::driver)?;
        tracing::debug!(
            host = self.options.get_host(),
            port = self.options.get_port(),
            "Database connection opened"
        );
        Ok(MySqlRunner { conn })
    }
}

/// A live connection executing one statement at a time.
pub struct MySqlRunner {
    conn: MySqlConnection,
}

impl StatementRunner for MySqlRunner {
    async fn execute(&mut self, sql: &str, timeout: Duration) -> Result<(), RunnerError> {
        let start = Instant::now();

        // If the timeout fires the in-flight query future is dropped; the
        // executor stops and the connection is closed right after.
        let result = tokio::time::timeout(timeout, (&mut self.conn).execute(sqlx::raw_sql(sql))).await;

        match result {
            Ok(Ok(done)) => {
                tracing::debug!(rows_affected = done.rows_affected(), "Statement completed");
                Ok(())
            }
            Ok(Err(e)) => Err(RunnerError::driver(e)),
            Err(_elapsed) => Err(RunnerError::Timeout {
                elapsed_ms: start.elapsed().as_millis() as u64,
            }),
        }
    }

    async fn close(self) {
        if let Err(e) = self.conn.close().await {
            tracing::warn!(error = %e, "Database connection did not close cleanly");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
