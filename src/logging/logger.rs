//! The logger: formats, persists, prints and notifies
//!
//! Every call runs synchronously on the caller's thread: build both message
//! variants, append the record to the log file, hand the display string to
//! the console, then publish warnings and errors to their channel.

use std::sync::Arc;

use crate::config::LoggerConfig;

use super::console::ConsoleSink;
use super::error::{LogError, LogResult};
use super::file_sink::FileSink;
use super::format::{CallSite, MessageFormatter, Severity, Title, FILE_ONLY_LABEL};
use super::notify::{Channel, NotificationBus};
use super::report::ErrorReport;

/// Separator between a custom message and the error description
pub const CUSTOM_MESSAGE_SEPARATOR: &str = "\n-------------\n";

/// Process logger. Holds only immutable configuration and shared handles.
///
/// Writes are serialized by the logger's own `FileSink`, so two loggers
/// pointed at the same file do not exclude each other. Keep one logger per
/// log path, normally the one installed with `logging::init`.
pub struct Logger {
    config: LoggerConfig,
    formatter: MessageFormatter,
    sink: FileSink,
    notifications: Arc<NotificationBus>,
    console: Box<dyn ConsoleSink>,
}

impl Logger {
    /// Build a logger writing to the configured log file
    pub fn new(config: LoggerConfig, console: impl ConsoleSink + 'static) -> Self {
        let formatter = MessageFormatter::new(config.theme.theme());
        let sink = FileSink::new(config.log_file_path());

        Self {
            config,
            formatter,
            sink,
            notifications: Arc::new(NotificationBus::new()),
            console: Box::new(console),
        }
    }

    /// Share an existing notification bus instead of a private one
    pub fn with_notifications(mut self, notifications: Arc<NotificationBus>) -> Self {
        self.notifications = notifications;
        self
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn formatter(&self) -> &MessageFormatter {
        &self.formatter
    }

    pub fn sink(&self) -> &FileSink {
        &self.sink
    }

    /// Warning and error channels
    pub fn notifications(&self) -> &Arc<NotificationBus> {
        &self.notifications
    }

    /// Plain log: file and console, no notification
    pub fn log(&self, message: &str, title: Option<&Title>, site: &CallSite) -> LogResult<()> {
        self.dispatch(Severity::Info, message, title, site, None)
    }

    /// Warning: file, console, then the warning channel
    pub fn log_warning(
        &self,
        message: &str,
        title: Option<&Title>,
        site: &CallSite,
    ) -> LogResult<()> {
        self.dispatch(Severity::Warning, message, title, site, None)
    }

    /// Error: file, console, then the error channel
    pub fn log_error(
        &self,
        message: &str,
        title: Option<&Title>,
        site: &CallSite,
    ) -> LogResult<()> {
        self.dispatch(Severity::Error, message, title, site, None)
    }

    /// Error from an error value; the file record carries its trace
    ///
    /// With a custom message the body is the custom message, a separator
    /// line, then the full error description.
    pub fn log_exception(
        &self,
        error: &ErrorReport,
        title: Option<&Title>,
        custom_message: Option<&str>,
        site: &CallSite,
    ) -> LogResult<()> {
        let message = match custom_message {
            Some(custom) if !custom.is_empty() => {
                format!("{}{}{}", custom, CUSTOM_MESSAGE_SEPARATOR, error.description())
            }
            _ => error.description().to_string(),
        };
        self.dispatch(Severity::Error, &message, title, site, Some(error.trace()))
    }

    /// File-only write, for silent diagnostic trails
    pub fn log_to_file(
        &self,
        message: &str,
        label: Option<&str>,
        site: &CallSite,
    ) -> LogResult<()> {
        let record =
            MessageFormatter::format_file_record(message, label.unwrap_or(FILE_ONLY_LABEL), site);
        self.sink
            .append(&record)
            .map_err(|e| LogError::io(self.sink.path(), e))
    }

    /// File-only write of an error's message followed by its trace
    pub fn log_error_to_file(
        &self,
        error: &ErrorReport,
        label: Option<&str>,
        site: &CallSite,
    ) -> LogResult<()> {
        let record = MessageFormatter::format_file_record(
            error.message(),
            label.unwrap_or(FILE_ONLY_LABEL),
            site,
        );
        self.sink
            .append_with_trace(&record, error.trace())
            .map_err(|e| LogError::io(self.sink.path(), e))
    }

    /// Archive the log file to `.old`
    pub fn reset_log_file(&self) -> LogResult<()> {
        self.sink
            .reset()
            .map_err(|e| LogError::io(self.sink.path(), e))
    }

    /// A failed file write is reported only after the console and the
    /// subscribers have seen the message.
    fn dispatch(
        &self,
        severity: Severity,
        message: &str,
        title: Option<&Title>,
        site: &CallSite,
        trace: Option<&str>,
    ) -> LogResult<()> {
        let display = self.formatter.format_display(message, title, severity, site);
        let record = MessageFormatter::format_file_record(message, severity.label(), site);

        let written = match trace {
            Some(trace) => self.sink.append_with_trace(&record, trace),
            None => self.sink.append(&record),
        };

        self.console.emit(severity, &display);

        if let Some(channel) = Channel::for_severity(severity) {
            self.notifications.publish(channel, &display);
        }

        written.map_err(|e| LogError::io(self.sink.path(), e))
    }
}
