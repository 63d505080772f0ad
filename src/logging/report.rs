//! Error values accepted by the error-logging calls

use std::backtrace::Backtrace;
use std::error::Error as StdError;

use super::error::LogError;

/// Snapshot of an error: its message, full description and trace text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    message: String,
    description: String,
    trace: String,
}

impl ErrorReport {
    pub fn new(
        message: impl Into<String>,
        description: impl Into<String>,
        trace: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            description: description.into(),
            trace: trace.into(),
        }
    }

    /// Build from any error, capturing a backtrace at this point
    ///
    /// The backtrace is only resolved when `RUST_BACKTRACE` or
    /// `RUST_LIB_BACKTRACE` enables it.
    pub fn from_error(error: &(dyn StdError + 'static)) -> Self {
        let mut description = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            push_cause(&mut description, &cause.to_string());
            source = cause.source();
        }

        Self {
            message: error.to_string(),
            description,
            trace: Backtrace::capture().to_string(),
        }
    }

    /// Top-level error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The error followed by its cause chain
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn trace(&self) -> &str {
        &self.trace
    }
}

fn push_cause(description: &mut String, cause: &str) {
    description.push_str("\nCaused by: ");
    description.push_str(cause);
}

impl From<&anyhow::Error> for ErrorReport {
    fn from(error: &anyhow::Error) -> Self {
        let mut description = error.to_string();
        for cause in error.chain().skip(1) {
            push_cause(&mut description, &cause.to_string());
        }

        Self {
            message: error.to_string(),
            description,
            trace: error.backtrace().to_string(),
        }
    }
}

impl From<&(dyn StdError + 'static)> for ErrorReport {
    fn from(error: &(dyn StdError + 'static)) -> Self {
        Self::from_error(error)
    }
}

impl From<&std::io::Error> for ErrorReport {
    fn from(error: &std::io::Error) -> Self {
        Self::from_error(error)
    }
}

impl From<&LogError> for ErrorReport {
    fn from(error: &LogError) -> Self {
        Self::from_error(error)
    }
}

impl From<&ErrorReport> for ErrorReport {
    fn from(report: &ErrorReport) -> Self {
        report.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_report_from_anyhow_chain() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "save.dat missing");
        let error = Err::<(), _>(missing)
            .context("failed to read save slot 2")
            .unwrap_err();

        let report = ErrorReport::from(&error);
        assert_eq!(report.message(), "failed to read save slot 2");
        assert_eq!(
            report.description(),
            "failed to read save slot 2\nCaused by: save.dat missing"
        );
        assert!(!report.trace().is_empty());
    }

    #[test]
    fn test_report_from_std_error() {
        let error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked");
        let report = ErrorReport::from(&error);
        assert_eq!(report.message(), "locked");
        assert_eq!(report.description(), "locked");
    }

    #[test]
    fn test_report_from_log_error_keeps_source() {
        let source = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let error = LogError::io("/saves/GameLog", source);

        let report = ErrorReport::from(&error);
        assert!(report.message().starts_with("log file operation failed on /saves/GameLog"));
        assert!(report.description().ends_with("\nCaused by: disk full"));
    }

    #[test]
    fn test_explicit_report() {
        let report = ErrorReport::new("short", "short\nlong", "frame 0");
        assert_eq!(ErrorReport::from(&report), report);
        assert_eq!(report.trace(), "frame 0");
    }
}
