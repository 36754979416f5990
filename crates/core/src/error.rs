use crate::scanner::ScanError;
use crate::scripting::runner::RunnerError;
use crate::COMPONENT_NAME;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Both database username and password must be defined")]
    MissingCredentials,

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// Terminal failure of one script run.
///
/// The `Display` output is the single user-facing line for the failure.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("{component}: configuration error: {0}", component = COMPONENT_NAME)]
    Configuration(#[from] ConfigError),

    #[error(
        "{component}: cannot split {target}: {source}",
        component = COMPONENT_NAME,
        target = describe_script(.script)
    )]
    Scan {
        script: Option<String>,
        #[source]
        source: ScanError,
    },

    #[error("{component}: cannot connect to the database: {0}", component = COMPONENT_NAME)]
    Connection(#[source] RunnerError),

    #[error(
        "{component}: Cannot execute SQL command '{statement}'{origin}. Underlying error: {source}",
        component = COMPONENT_NAME,
        origin = from_script(.script)
    )]
    Statement {
        script: Option<String>,
        /// 0-based position in the command buffer.
        index: usize,
        line: usize,
        statement: String,
        /// `true` when continue-on-error was off.
        aborted: bool,
        #[source]
        source: RunnerError,
    },
}

impl ProcessError {
    /// Whether the caller should stop all further work.
    ///
    /// Only a statement failure reported under continue-on-error is
    /// recoverable.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Configuration(_) | Self::Scan { .. } | Self::Connection(_) => true,
            Self::Statement { aborted, .. } => *aborted,
        }
    }
}

fn describe_script(script: &Option<String>) -> String {
    match script {
        Some(name) => format!("'{name}'"),
        None => "the SQL script".to_string(),
    }
}

fn from_script(script: &Option<String>) -> String {
    match script {
        Some(name) => format!(" from the file '{name}'"),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn statement_error(script: Option<&str>, aborted: bool) -> ProcessError {
        ProcessError::Statement {
            script: script.map(str::to_string),
            index: 1,
            line: 3,
            statement: "DROP TABLE missing".to_string(),
            aborted,
            source: RunnerError::Timeout { elapsed_ms: 60_000 },
        }
    }

    #[test]
    fn statement_message_names_statement_script_and_cause() {
        let err = statement_error(Some("schema.sql"), false);
        assert_eq!(
            err.to_string(),
            "sqlrun: Cannot execute SQL command 'DROP TABLE missing' from the file \
             'schema.sql'. Underlying error: Statement timed out after 60000ms"
        );
    }

    #[test]
    fn statement_message_without_script_name() {
        let err = statement_error(None, false);
        assert_eq!(
            err.to_string(),
            "sqlrun: Cannot execute SQL command 'DROP TABLE missing'. Underlying error: \
             Statement timed out after 60000ms"
        );
    }

    #[test]
    fn scan_message_names_script() {
        let err = ProcessError::Scan {
            script: Some("proc.sql".to_string()),
            source: ScanError::UnterminatedDirective { line: 4 },
        };
        assert_eq!(
            err.to_string(),
            "sqlrun: cannot split 'proc.sql': DELIMITER directive on line 4 is not followed by a line break"
        );
    }

    #[test]
    fn configuration_message() {
        let err = ProcessError::from(ConfigError::MissingCredentials);
        assert_eq!(
            err.to_string(),
            "sqlrun: configuration error: Both database username and password must be defined"
        );
    }

    #[test]
    fn fatality_follows_policy() {
        assert!(statement_error(None, true).is_fatal());
        assert!(!statement_error(None, false).is_fatal());
        assert!(ProcessError::from(ConfigError::MissingCredentials).is_fatal());
        assert!(ProcessError::Connection(RunnerError::Timeout { elapsed_ms: 1 }).is_fatal());
    }

    #[test]
    fn statement_error_exposes_source() {
        let err = statement_error(None, true);
        assert!(
            std::error::Error::source(&err).is_some(),
            "Statement variant should have a source"
        );
    }
}
