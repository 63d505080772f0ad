//! Message formatting
//!
//! Every log call produces two strings: a display string with color markup for
//! the console, and a plain record for the log file. Both carry the call site.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::color::Color;
use super::error::LogError;

/// File label for `Severity::Info`
pub const LOG_LABEL: &str = "Log!    ";
/// File label for `Severity::Warning`
pub const WARNING_LABEL: &str = "Warning!";
/// File label for `Severity::Error`
pub const ERROR_LABEL: &str = "Error!  ";
/// Default label for file-only writes
pub const FILE_ONLY_LABEL: &str = "ToFile! ";

/// Matches display-only markup such as `<color=#FF0000FF>` or `</b>`
static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("<(.*?)>").expect("tag pattern is valid"));

/// Severity of a log call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Fixed-width label written to the log file
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => LOG_LABEL,
            Severity::Warning => WARNING_LABEL,
            Severity::Error => ERROR_LABEL,
        }
    }

    /// Title color used when the caller did not pick one
    pub fn default_title_color(&self) -> Color {
        match self {
            Severity::Warning => Color::WHITE,
            Severity::Info | Severity::Error => Color::CLEAR,
        }
    }

    /// Color a title is drawn in. Warnings treat the all-zero color as unset.
    pub fn title_color(&self, requested: Option<Color>) -> Color {
        match requested {
            Some(color) if !(*self == Severity::Warning && color == Color::CLEAR) => color,
            _ => self.default_title_color(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a log call was made
///
/// Usually built by the `call_site!()` macro rather than by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    /// Source path as reported by `file!()`
    pub file: &'static str,
    pub line: u32,
    /// Name of the enclosing function
    pub member: &'static str,
}

impl CallSite {
    pub const fn new(file: &'static str, line: u32, member: &'static str) -> Self {
        Self { file, line, member }
    }

    /// File name component of the source path
    pub fn file_name(&self) -> &str {
        Path::new(self.file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(self.file)
    }
}

/// Optional colored tag shown in front of a console message
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Title {
    pub text: String,
    /// `None` falls back to the severity default
    pub color: Option<Color>,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }

    pub fn colored(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl From<&str> for Title {
    fn from(text: &str) -> Self {
        Title::new(text)
    }
}

impl From<(&str, Color)> for Title {
    fn from((text, color): (&str, Color)) -> Self {
        Title::colored(text, color)
    }
}

/// Colors for the call-site footer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub source_color: Color,
    pub line_color: Color,
}

impl Theme {
    /// Footer colors readable on a dark console background
    pub fn dark() -> Self {
        Self {
            source_color: Color::from_rgba8(0xFF, 0xFF, 0xFF, 0xFF),
            line_color: Color::from_rgba8(0xB5, 0xB1, 0x80, 0xFF),
        }
    }

    /// Footer colors readable on a light console background
    pub fn light() -> Self {
        Self {
            source_color: Color::from_rgba8(0x1C, 0x1C, 0x1C, 0xFF),
            line_color: Color::from_rgba8(0x04, 0x4B, 0x4B, 0xFF),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Named theme, as stored in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreset {
    #[default]
    Dark,
    Light,
}

impl ThemePreset {
    pub fn theme(&self) -> Theme {
        match self {
            ThemePreset::Dark => Theme::dark(),
            ThemePreset::Light => Theme::light(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreset::Dark => "dark",
            ThemePreset::Light => "light",
        }
    }
}

impl FromStr for ThemePreset {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(ThemePreset::Dark),
            "light" => Ok(ThemePreset::Light),
            _ => Err(LogError::InvalidTheme(s.to_string())),
        }
    }
}

/// Remove every `<...>` tag from a message
pub fn strip_tags(message: &str) -> String {
    TAG_PATTERN.replace_all(message, "").into_owned()
}

/// Builds the display and file variants of a message
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageFormatter {
    theme: Theme,
}

impl MessageFormatter {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Console text: optional `[title]` tag, the message, then a colored
    /// `file:line member()` footer on its own line
    pub fn format_display(
        &self,
        message: &str,
        title: Option<&Title>,
        severity: Severity,
        site: &CallSite,
    ) -> String {
        let tag = match title {
            Some(title) if !title.is_empty() => {
                let color = severity.title_color(title.color);
                format!("<color={}>[{}]</color>", color, title.text)
            }
            _ => String::new(),
        };

        format!(
            "{} {}\n<color={}><b>{}:</b></color><color={}>{}</color> {}()",
            tag,
            message,
            self.theme.source_color,
            site.file_name(),
            self.theme.line_color,
            site.line,
            site.member
        )
    }

    /// File text: `LABEL (at file:line) member() : message`, tags stripped
    pub fn format_file_record(message: &str, label: &str, site: &CallSite) -> String {
        format!(
            "{} (at {}:{}) {}() : {}",
            label,
            site.file_name(),
            site.line,
            site.member,
            strip_tags(message)
        )
    }
}
