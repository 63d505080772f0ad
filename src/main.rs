use std::collections::VecDeque;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use gamelog::config::{self, LoggerConfig};
use gamelog::logging::{Logger, ThemePreset, Title, TracingConsole};
use gamelog::shell;

/// Inspect and manage the persistent game log
#[derive(Parser)]
#[command(name = "gamelog", version, about)]
struct Cli {
    /// Directory holding the log file (overrides config and GAMELOG_DIR)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Footer color preset for console output
    #[arg(long, global = true, value_enum)]
    theme: Option<ThemeArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the log file and backup paths
    Path,

    /// Open the log directory in the file browser
    Reveal,

    /// Archive the current log to .old
    Reset,

    /// Write a message through the logger
    Write {
        message: String,

        #[arg(short, long, value_enum, default_value = "info")]
        severity: SeverityArg,

        /// Title tag shown in front of the console message
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Print the last lines of the log file
    Tail {
        #[arg(short = 'n', long, default_value_t = 20)]
        lines: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Dark,
    Light,
}

#[derive(Clone, Copy, ValueEnum)]
enum SeverityArg {
    Info,
    Warning,
    Error,
    /// File only, no console output
    File,
}

fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gamelog=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut config = LoggerConfig::load()?;
    if let Some(dir) = cli.dir {
        config.log_dir = dir;
    }
    if let Some(theme) = cli.theme {
        config.theme = match theme {
            ThemeArg::Dark => ThemePreset::Dark,
            ThemeArg::Light => ThemePreset::Light,
        };
    }

    run(cli.command, config)
}

fn run(command: Commands, config: LoggerConfig) -> Result<()> {
    match command {
        Commands::Path => {
            let logger = Logger::new(config, TracingConsole);
            println!("{}", logger.sink().path().display());
            println!("{}", logger.sink().backup_path().display());
        }
        Commands::Reveal => {
            config::ensure_directories(&config)?;
            shell::reveal_dir(&config.resolved_log_dir())?;
        }
        Commands::Reset => {
            let logger = Logger::new(config, TracingConsole);
            logger.reset_log_file()?;
            tracing::info!("Log archived to {}", logger.sink().backup_path().display());
        }
        Commands::Write {
            message,
            severity,
            title,
        } => {
            let logger = Logger::new(config, TracingConsole);
            let title = title.map(Title::new);
            let site = gamelog::call_site!();

            match severity {
                SeverityArg::Info => logger.log(&message, title.as_ref(), &site)?,
                SeverityArg::Warning => logger.log_warning(&message, title.as_ref(), &site)?,
                SeverityArg::Error => logger.log_error(&message, title.as_ref(), &site)?,
                SeverityArg::File => logger.log_to_file(&message, None, &site)?,
            }
        }
        Commands::Tail { lines } => {
            let path = config.log_file_path();
            if !path.exists() {
                tracing::info!("No log file at {}", path.display());
                return Ok(());
            }

            let file = std::fs::File::open(&path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            for line in last_lines(BufReader::new(file), lines)? {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

/// Keep the last `count` lines of `reader`
fn last_lines(reader: impl BufRead, count: usize) -> Result<VecDeque<String>> {
    let mut tail = VecDeque::with_capacity(count.min(1024));
    for line in reader.lines() {
        let line = line.context("Failed to read log file")?;
        if tail.len() == count {
            tail.pop_front();
        }
        if count > 0 {
            tail.push_back(line);
        }
    }
    Ok(tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_lines_keeps_tail() {
        let input = "one\ntwo\nthree\n".as_bytes();
        let tail = last_lines(input, 2).unwrap();
        assert_eq!(tail, ["two", "three"]);
    }

    #[test]
    fn test_last_lines_huge_count() {
        let input = "one\ntwo\n".as_bytes();
        let tail = last_lines(input, usize::MAX).unwrap();
        assert_eq!(tail, ["one", "two"]);
    }

    #[test]
    fn test_last_lines_zero_count() {
        assert!(last_lines("one\n".as_bytes(), 0).unwrap().is_empty());
    }
}
