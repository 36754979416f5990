//! Running a list of script files in order.

use std::process::ExitCode;

use sqlrun_core::scripting::processor::ScriptProcessor;
use sqlrun_core::scripting::runner::Connector;

use crate::source;

/// Exit code when at least one script failed.
pub const EXIT_FAILED: u8 = 1;

/// Exit code when a fatal error stopped the run.
pub const EXIT_FATAL: u8 = 2;

/// Tally of a batch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Files never attempted because of a fatal error.
    pub skipped: usize,
    pub fatal: bool,
}

impl BatchSummary {
    pub fn exit_code(&self) -> ExitCode {
        if self.fatal {
            ExitCode::from(EXIT_FATAL)
        } else if self.failed > 0 {
            ExitCode::from(EXIT_FAILED)
        } else {
            ExitCode::SUCCESS
        }
    }
}

/// Run each file through `processor`, in order.
///
/// A recoverable failure is logged and the next file runs. A fatal error
/// (see `ProcessError::is_fatal`) stops the batch.
pub async fn run_files<C: Connector>(processor: &ScriptProcessor<C>, files: &[String]) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for (position, file) in files.iter().enumerate() {
        let script = match source::load(file).await {
            Ok(script) => script,
            Err(e) => {
                tracing::error!(file = %file, error = %e, "Cannot read script");
                summary.failed += 1;
                continue;
            }
        };

        match processor.process(script).await {
            Ok(report) => {
                tracing::debug!(
                    file = %file,
                    statements = report.statements_executed,
                    "Script completed"
                );
                summary.succeeded += 1;
            }
            Err(e) if e.is_fatal() => {
                tracing::error!(error = %e, "Aborting");
                summary.failed += 1;
                summary.fatal = true;
                summary.skipped = files.len() - position - 1;
                break;
            }
            Err(e) => {
                tracing::error!(error = %e, "Script failed");
                summary.failed += 1;
            }
        }
    }

    summary
}
