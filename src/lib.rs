//! gamelog - call-site aware logging with a persistent, rotating log file
//!
//! This library provides the logger, its configuration, and a helper to
//! reveal the log directory in the OS file browser.

pub mod config;
pub mod logging;
pub mod shell;

pub use config::LoggerConfig;
pub use logging::{
    CallSite, Channel, Color, ConsoleSink, ErrorReport, LogError, LogResult, Logger,
    NotificationBus, Severity, Title,
};
