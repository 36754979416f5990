use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;
use crate::scripting::executor::ExecutionOptions;

/// Default database host.
pub const DEFAULT_HOST: &str = "localhost";

/// Default MySQL port.
pub const DEFAULT_PORT: u16 = 3306;

/// Default per-statement timeout.
pub const DEFAULT_STATEMENT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default pause between a successful statement and the next one.
pub const DEFAULT_STATEMENT_DELAY: Duration = Duration::from_millis(40);

/// How much progress the executor reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Nothing at all.
    Silent = 0,
    /// One notice per script.
    #[default]
    Low = 1,
    /// Per-statement progress.
    Med = 2,
    /// Per-statement progress with statement text, success confirmations and
    /// connection lifecycle.
    Full = 3,
}

impl Verbosity {
    /// Parse a verbosity name. Unknown names fall back to [`Verbosity::Low`].
    ///
    /// | Input          | Level    |
    /// |----------------|----------|
    /// | `NONE`         | `Silent` |
    /// | `MED`, `M`     | `Med`    |
    /// | `FULL`, `F`    | `Full`   |
    /// | anything else  | `Low`    |
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "NONE" => Self::Silent,
            "MED" | "M" => Self::Med,
            "FULL" | "F" => Self::Full,
            _ => Self::Low,
        }
    }
}

/// Parameters for opening a database connection.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: Option<String>,
}

impl ConnectionConfig {
    /// Build a config with default host and port.
    ///
    /// Both credentials are required; an empty username or password is
    /// rejected.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self, ConfigError> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() || password.is_empty() {
            return Err(ConfigError::MissingCredentials);
        }
        Ok(Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            username,
            password,
            database: None,
        })
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

/// Complete runtime configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ScriptConfig {
    pub connection: ConnectionConfig,
    /// Report a failed statement instead of aborting (default: `true`).
    pub continue_on_error: bool,
    pub verbosity: Verbosity,
    pub statement_timeout: Duration,
    pub statement_delay: Duration,
}

impl ScriptConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                         | Default     |
    /// |---------------------------------|-------------|
    /// | `SQLRUN_USER`                   | required    |
    /// | `SQLRUN_PASSWORD`               | required    |
    /// | `SQLRUN_HOST`                   | `localhost` |
    /// | `SQLRUN_PORT`                   | `3306`      |
    /// | `SQLRUN_DATABASE`               | none        |
    /// | `SQLRUN_CONTINUE_ON_ERROR`      | `true`      |
    /// | `SQLRUN_VERBOSITY`              | `LOW`       |
    /// | `SQLRUN_STATEMENT_TIMEOUT_SECS` | `60`        |
    /// | `SQLRUN_STATEMENT_DELAY_MS`     | `40`        |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let username = var("SQLRUN_USER").unwrap_or_default();
        let password = var("SQLRUN_PASSWORD").unwrap_or_default();
        let mut connection = ConnectionConfig::new(username, password)?;

        if let Some(host) = var("SQLRUN_HOST") {
            connection.host = host;
        }
        if let Some(port) = var("SQLRUN_PORT") {
            connection.port = parse_value("SQLRUN_PORT", &port)?;
        }
        connection.database = var("SQLRUN_DATABASE");

        let continue_on_error = var("SQLRUN_CONTINUE_ON_ERROR")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        let verbosity = var("SQLRUN_VERBOSITY")
            .map(|v| Verbosity::parse(&v))
            .unwrap_or_default();

        let statement_timeout = match var("SQLRUN_STATEMENT_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_nonzero("SQLRUN_STATEMENT_TIMEOUT_SECS", &v)?),
            None => DEFAULT_STATEMENT_TIMEOUT,
        };

        let statement_delay = match var("SQLRUN_STATEMENT_DELAY_MS") {
            Some(v) => Duration::from_millis(parse_value("SQLRUN_STATEMENT_DELAY_MS", &v)?),
            None => DEFAULT_STATEMENT_DELAY,
        };

        Ok(Self {
            connection,
            continue_on_error,
            verbosity,
            statement_timeout,
            statement_delay,
        })
    }

    /// Executor settings derived from this config.
    pub fn execution_options(&self) -> ExecutionOptions {
        ExecutionOptions {
            continue_on_error: self.continue_on_error,
            verbosity: self.verbosity,
            statement_timeout: self.statement_timeout,
            statement_delay: self.statement_delay,
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

/// A zero timeout would fail every statement, so it is rejected.
fn parse_nonzero(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    match parse_value(key, value)? {
        0 => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
        n => Ok(n),
    }
}

/// Only an explicit "off" value disables a flag.
fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "no" | "off"
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ScriptConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ScriptConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn verbosity_names() {
        assert_eq!(Verbosity::parse("NONE"), Verbosity::Silent);
        assert_eq!(Verbosity::parse("MED"), Verbosity::Med);
        assert_eq!(Verbosity::parse("m"), Verbosity::Med);
        assert_eq!(Verbosity::parse("FULL"), Verbosity::Full);
        assert_eq!(Verbosity::parse("F"), Verbosity::Full);
        assert_eq!(Verbosity::parse("LOW"), Verbosity::Low);
        assert_eq!(Verbosity::parse("whatever"), Verbosity::Low);
    }

    #[test]
    fn verbosity_levels_are_ordered() {
        assert!(Verbosity::Silent < Verbosity::Low);
        assert!(Verbosity::Low < Verbosity::Med);
        assert!(Verbosity::Med < Verbosity::Full);
        assert_eq!(Verbosity::Full as u8, 3);
    }

    #[test]
    fn defaults_apply_when_only_credentials_are_set() {
        let config = load(&[("SQLRUN_USER", "app"), ("SQLRUN_PASSWORD", "secret")])
            .expect("config should load");
        assert_eq!(config.connection.host, "localhost");
        assert_eq!(config.connection.port, 3306);
        assert_eq!(config.connection.database, None);
        assert!(config.continue_on_error);
        assert_eq!(config.verbosity, Verbosity::Low);
        assert_eq!(config.statement_timeout, Duration::from_secs(60));
        assert_eq!(config.statement_delay, Duration::from_millis(40));
    }

    #[test]
    fn overrides_are_read() {
        let config = load(&[
            ("SQLRUN_USER", "app"),
            ("SQLRUN_PASSWORD", "secret"),
            ("SQLRUN_HOST", "db.internal"),
            ("SQLRUN_PORT", "3307"),
            ("SQLRUN_DATABASE", "shop"),
            ("SQLRUN_CONTINUE_ON_ERROR", "false"),
            ("SQLRUN_VERBOSITY", "FULL"),
            ("SQLRUN_STATEMENT_TIMEOUT_SECS", "5"),
            ("SQLRUN_STATEMENT_DELAY_MS", "0"),
        ])
        .expect("config should load");
        assert_eq!(config.connection.host, "db.internal");
        assert_eq!(config.connection.port, 3307);
        assert_eq!(config.connection.database.as_deref(), Some("shop"));
        assert!(!config.continue_on_error);
        assert_eq!(config.verbosity, Verbosity::Full);
        assert_eq!(config.statement_timeout, Duration::from_secs(5));
        assert_eq!(config.statement_delay, Duration::ZERO);
    }

    #[test]
    fn missing_credentials_are_rejected() {
        assert_matches!(load(&[]), Err(ConfigError::MissingCredentials));
        assert_matches!(
            load(&[("SQLRUN_USER", "app")]),
            Err(ConfigError::MissingCredentials)
        );
        assert_matches!(
            load(&[("SQLRUN_USER", "app"), ("SQLRUN_PASSWORD", "  ")]),
            Err(ConfigError::MissingCredentials)
        );
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert_matches!(
            load(&[
                ("SQLRUN_USER", "app"),
                ("SQLRUN_PASSWORD", "secret"),
                ("SQLRUN_PORT", "mysql"),
            ]),
            Err(ConfigError::InvalidValue { key: "SQLRUN_PORT", .. })
        );
    }

    #[test]
    fn zero_statement_timeout_is_rejected() {
        assert_matches!(
            load(&[
                ("SQLRUN_USER", "app"),
                ("SQLRUN_PASSWORD", "secret"),
                ("SQLRUN_STATEMENT_TIMEOUT_SECS", "0"),
            ]),
            Err(ConfigError::InvalidValue {
                key: "SQLRUN_STATEMENT_TIMEOUT_SECS",
                ..
            })
        );
    }

    #[test]
    fn continue_on_error_stays_on_unless_explicitly_disabled() {
        assert!(parse_flag("true"));
        assert!(parse_flag("yes"));
        assert!(parse_flag("anything"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("OFF"));
    }

    #[test]
    fn debug_output_hides_password() {
        let config = ConnectionConfig::new("app", "hunter2").expect("valid credentials");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn execution_options_mirror_config() {
        let config = load(&[
            ("SQLRUN_USER", "app"),
            ("SQLRUN_PASSWORD", "secret"),
            ("SQLRUN_VERBOSITY", "M"),
        ])
        .expect("config should load");
        let options = config.execution_options();
        assert_eq!(options.verbosity, Verbosity::Med);
        assert!(options.continue_on_error);
        assert_eq!(options.statement_timeout, DEFAULT_STATEMENT_TIMEOUT);
    }
}
