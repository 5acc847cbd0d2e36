//! Helpers for the external command-line tools the extractors shell out to.

use std::path::Path;
use std::process::{ExitStatus, Output};

/// Check if a binary is available in PATH (or exists, for explicit paths).
pub fn check_binary(name: impl AsRef<Path>) -> bool {
    let name = name.as_ref();
    if name.components().count() > 1 {
        return name.is_file();
    }
    which::which(name).is_ok()
}

/// Outcome of running an external tool.
#[derive(Debug)]
pub enum ToolFailure {
    /// The binary could not be found.
    NotFound,
    /// The tool ran but exited unsuccessfully; carries stderr.
    Failed(String),
    /// Spawning or waiting failed for another reason.
    Io(std::io::Error),
}

/// Handle command output, extracting stdout on success.
pub fn stdout_of(result: std::io::Result<Output>) -> Result<String, ToolFailure> {
    match result {
        Ok(output) => {
            if output.status.success() {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(ToolFailure::Failed(stderr.trim().to_string()))
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ToolFailure::NotFound),
        Err(e) => Err(ToolFailure::Io(e)),
    }
}

/// Check command status.
pub fn status_of(result: std::io::Result<ExitStatus>) -> Result<(), ToolFailure> {
    match result {
        Ok(s) if s.success() => Ok(()),
        Ok(s) => Err(ToolFailure::Failed(format!("exited with {}", s))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ToolFailure::NotFound),
        Err(e) => Err(ToolFailure::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary() {
        assert!(!check_binary("definitely-not-a-real-binary-4f1c"));
        assert!(!check_binary("/nonexistent/dir/tesseract"));
    }

    #[test]
    fn test_not_found_maps_to_tool_failure() {
        let result = std::process::Command::new("definitely-not-a-real-binary-4f1c").output();
        assert!(matches!(stdout_of(result), Err(ToolFailure::NotFound)));
    }
}
