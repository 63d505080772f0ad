//! Reveal the persistent log directory in the native file browser

use std::path::Path;
use std::process::Command;

use crate::logging::{LogError, LogResult};

/// Program used to open a directory on this platform
pub fn reveal_command() -> &'static str {
    if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// Open `dir` in the file browser without waiting for it to exit
pub fn reveal_dir(dir: &Path) -> LogResult<()> {
    if !dir.is_dir() {
        return Err(LogError::Shell {
            path: dir.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    let program = reveal_command();
    tracing::debug!("Opening {} with {}", dir.display(), program);

    Command::new(program)
        .arg(dir)
        .spawn()
        .map_err(|e| LogError::Shell {
            path: dir.to_path_buf(),
            reason: format!("{} could not be started: {}", program, e),
        })?;

    Ok(())
}
