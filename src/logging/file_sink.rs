//! Append-only log file with single-backup rotation
//!
//! Each write opens the file, appends, and closes it again. A mutex
//! serializes writes and rotation so lines never interleave and a rotation
//! never races an in-flight append.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;

/// Line written after a record's trace text
pub const TRACE_HEADER: &str = "Trace:";
/// Line closing a trace block
pub const TRACE_END_MARKER: &str = "EndOfTrace -------------------------------";
/// Suffix of the archived log file
pub const BACKUP_SUFFIX: &str = ".old";

/// Writer for a single persistent log file
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    backup_path: PathBuf,
    lock: Mutex<()>,
}

impl FileSink {
    /// Create a sink for the given file path. Nothing is touched on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut backup = path.clone().into_os_string();
        backup.push(BACKUP_SUFFIX);

        Self {
            path,
            backup_path: PathBuf::from(backup),
            lock: Mutex::new(()),
        }
    }

    /// Path of the current log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the archived log file
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// Append one timestamped record line
    pub fn append(&self, record: &str) -> io::Result<()> {
        let line = timestamped(record);
        self.write_locked(|file| writeln!(file, "{}", line))
    }

    /// Append a timestamped record followed by a delimited trace block
    pub fn append_with_trace(&self, record: &str, trace: &str) -> io::Result<()> {
        let mut block = timestamped(record);
        block.push('\n');
        block.push_str(TRACE_HEADER);
        block.push('\n');
        block.push_str(trace);
        if !trace.ends_with('\n') {
            block.push('\n');
        }
        block.push_str(TRACE_END_MARKER);
        block.push('\n');

        self.write_locked(|file| file.write_all(block.as_bytes()))
    }

    /// Archive the current file to `.old`, discarding any previous archive
    ///
    /// Does nothing when there is no current file. If the rename fails the
    /// current file stays where it was.
    pub fn reset(&self) -> io::Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if !self.path.exists() {
            return Ok(());
        }

        if self.backup_path.exists() {
            fs::remove_file(&self.backup_path)?;
        }
        fs::rename(&self.path, &self.backup_path)?;

        tracing::debug!(
            "Rotated log file {} -> {}",
            self.path.display(),
            self.backup_path.display()
        );
        Ok(())
    }

    /// Open in append mode, run the write, close, all under the lock
    fn write_locked<F>(&self, write: F) -> io::Result<()>
    where
        F: FnOnce(&mut fs::File) -> io::Result<()>,
    {
        // A panic while holding the guard cannot leave the file half-open,
        // so a poisoned lock is still safe to use.
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        write(&mut file)?;
        file.flush()
    }
}

/// Prefix a record with the current UTC time and a tab
fn timestamped(record: &str) -> String {
    format!("{}\t{}", Utc::now().format("%H:%M:%S"), record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sink_in(dir: &TempDir) -> FileSink {
        FileSink::new(dir.path().join("GameLog"))
    }

    #[test]
    fn test_backup_path_has_old_suffix() {
        let sink = FileSink::new("/tmp/saves/GameLog");
        assert_eq!(sink.backup_path(), Path::new("/tmp/saves/GameLog.old"));
    }

    #[test]
    fn test_append_writes_timestamped_lines() {
        let temp_dir = TempDir::new().unwrap();
        let sink = sink_in(&temp_dir);

        sink.append("first").unwrap();
        sink.append("second").unwrap();

        let content = fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let (time, record) = lines[0].split_once('\t').unwrap();
        assert_eq!(record, "first");
        assert_eq!(time.len(), 8);
        assert!(chrono::NaiveTime::parse_from_str(time, "%H:%M:%S").is_ok());
        assert!(lines[1].ends_with("\tsecond"));
    }

    #[test]
    fn test_append_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let sink = FileSink::new(temp_dir.path().join("nested").join("dir").join("GameLog"));

        sink.append("hello").unwrap();
        assert!(sink.path().exists());
    }

    #[test]
    fn test_append_with_trace_block() {
        let temp_dir = TempDir::new().unwrap();
        let sink = sink_in(&temp_dir);

        sink.append_with_trace("boom", "at frame one\nat frame two").unwrap();

        let content = fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].ends_with("\tboom"));
        assert_eq!(lines[1], TRACE_HEADER);
        assert_eq!(lines[2], "at frame one");
        assert_eq!(lines[3], "at frame two");
        assert_eq!(lines[4], TRACE_END_MARKER);
    }

    #[test]
    fn test_append_with_empty_trace() {
        let temp_dir = TempDir::new().unwrap();
        let sink = sink_in(&temp_dir);

        sink.append_with_trace("boom", "").unwrap();

        let content = fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[1], TRACE_HEADER);
        assert_eq!(lines.last().copied(), Some(TRACE_END_MARKER));
    }

    #[test]
    fn test_reset_without_file_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let sink = sink_in(&temp_dir);

        sink.reset().unwrap();

        assert!(!sink.path().exists());
        assert!(!sink.backup_path().exists());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_reset_archives_current_file() {
        let temp_dir = TempDir::new().unwrap();
        let sink = sink_in(&temp_dir);

        sink.append("before reset").unwrap();
        sink.reset().unwrap();

        assert!(!sink.path().exists());
        let archived = fs::read_to_string(sink.backup_path()).unwrap();
        assert!(archived.contains("before reset"));

        sink.append("after reset").unwrap();
        let current = fs::read_to_string(sink.path()).unwrap();
        assert!(current.contains("after reset"));
        assert!(!current.contains("before reset"));
    }

    #[test]
    fn test_reset_replaces_previous_backup() {
        let temp_dir = TempDir::new().unwrap();
        let sink = sink_in(&temp_dir);

        sink.append("generation one").unwrap();
        sink.reset().unwrap();
        sink.append("generation two").unwrap();
        sink.reset().unwrap();

        let archived = fs::read_to_string(sink.backup_path()).unwrap();
        assert!(archived.contains("generation two"));
        assert!(!archived.contains("generation one"));
        assert!(!sink.path().exists());
    }

    #[test]
    fn test_reset_failure_keeps_current_file() {
        let temp_dir = TempDir::new().unwrap();
        let sink = sink_in(&temp_dir);

        sink.append("keep me").unwrap();
        // A non-empty directory in the backup slot cannot be removed as a file
        fs::create_dir(sink.backup_path()).unwrap();
        fs::write(sink.backup_path().join("occupant"), "x").unwrap();

        assert!(sink.reset().is_err());

        let current = fs::read_to_string(sink.path()).unwrap();
        assert!(current.contains("keep me"));
        assert!(sink.backup_path().join("occupant").exists());
    }

    #[test]
    fn test_double_reset_keeps_single_backup() {
        let temp_dir = TempDir::new().unwrap();
        let sink = sink_in(&temp_dir);

        sink.append("only entry").unwrap();
        sink.reset().unwrap();
        sink.reset().unwrap();

        // Nothing was logged in between, so the second reset has nothing to move
        assert!(!sink.path().exists());
        assert!(sink.backup_path().exists());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }
}
