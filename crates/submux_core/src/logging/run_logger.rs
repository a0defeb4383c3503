//! Per-run log file writer.
//!
//! Each batch run gets its own timestamped log file in the configured
//! logs folder, recording every pair attempt, the exact tool commands,
//! and the final summary.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use parking_lot::Mutex;

/// Log file writer for one batch run.
pub struct RunLogger {
    log_path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl RunLogger {
    /// Create a logger writing to `<log_dir>/<run_name>_<timestamp>.log`.
    pub fn new(run_name: &str, log_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let log_dir = log_dir.as_ref();
        fs::create_dir_all(log_dir)?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let log_path = log_dir.join(format!("{}_{}.log", sanitize_filename(run_name), stamp));
        let file = File::create(&log_path)?;

        Ok(Self {
            log_path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Get the log file path.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Log an informational line.
    pub fn info(&self, message: &str) {
        self.write_line(message);
    }

    /// Log a warning line.
    pub fn warn(&self, message: &str) {
        self.write_line(&format!("[WARNING] {}", message));
    }

    /// Log an error line.
    pub fn error(&self, message: &str) {
        self.write_line(&format!("[ERROR] {}", message));
    }

    /// Log a command being executed.
    pub fn command(&self, command: &str) {
        self.write_line(&format!("$ {}", command));
    }

    fn write_line(&self, line: &str) {
        let stamped = format!("[{}] {}\n", Local::now().format("%H:%M:%S"), line);
        let mut writer = self.writer.lock();
        // log writing must never fail the run
        let _ = writer.write_all(stamped.as_bytes());
        let _ = writer.flush();
    }
}

/// Replace characters that are unsafe in file names.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_writes_timestamped_lines() {
        let dir = tempfile::tempdir().unwrap();
        let logger = RunLogger::new("batch", dir.path()).unwrap();

        logger.info("starting");
        logger.command("mkvmerge -o out.mkv");
        logger.error("boom");

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("starting"));
        assert!(content.contains("$ mkvmerge -o out.mkv"));
        assert!(content.contains("[ERROR] boom"));
    }

    #[test]
    fn run_name_is_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let logger = RunLogger::new("my run/1", dir.path()).unwrap();

        let name = logger.log_path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("my_run_1_"));
        assert!(name.ends_with(".log"));
    }
}
