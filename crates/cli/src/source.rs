//! Loading scripts from files or standard input.

use sqlrun_core::scripting::processor::ScriptSource;
use tokio::io::AsyncReadExt;

/// Argument that selects standard input.
pub const STDIN_ARG: &str = "-";

/// Read the script named by `arg`.
///
/// Scripts read from standard input have no name.
pub async fn load(arg: &str) -> std::io::Result<ScriptSource> {
    if arg == STDIN_ARG {
        let mut contents = Vec::new();
        tokio::io::stdin().read_to_end(&mut contents).await?;
        return Ok(ScriptSource::new(None, contents));
    }

    let contents = tokio::fs::read(arg).await?;
    Ok(ScriptSource::new(Some(arg.to_string()), contents))
}
