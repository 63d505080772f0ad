//! Logging system for gamelog
//!
//! Formats messages with their call site, appends them to a persistent log
//! file, prints them to a console sink, and notifies subscribers of
//! warnings and errors.

mod color;
mod console;
mod error;
mod file_sink;
mod format;
mod logger;
#[doc(hidden)]
pub mod macros;
mod notify;
mod report;

use std::sync::OnceLock;

pub use color::Color;
pub use console::{BufferedConsole, ConsoleEntry, ConsoleSink, TracingConsole};
pub use error::{LogError, LogResult};
pub use file_sink::{FileSink, BACKUP_SUFFIX, TRACE_END_MARKER, TRACE_HEADER};
pub use format::{
    strip_tags, CallSite, MessageFormatter, Severity, Theme, ThemePreset, Title, ERROR_LABEL,
    FILE_ONLY_LABEL, LOG_LABEL, WARNING_LABEL,
};
pub use logger::{Logger, CUSTOM_MESSAGE_SEPARATOR};
pub use notify::{Channel, NotificationBus, SubscriptionId};
pub use report::ErrorReport;

static GLOBAL_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Install the process-wide logger
///
/// Can only be done once; later calls return `LogError::AlreadyInitialized`.
pub fn init(logger: Logger) -> LogResult<&'static Logger> {
    GLOBAL_LOGGER
        .set(logger)
        .map_err(|_| LogError::AlreadyInitialized)?;
    global().ok_or(LogError::AlreadyInitialized)
}

/// The process-wide logger, if one was installed
pub fn global() -> Option<&'static Logger> {
    GLOBAL_LOGGER.get()
}
