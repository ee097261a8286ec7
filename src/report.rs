//! Decode report sink
//!
//! The batch decoder reports per-line failures and its final summary through
//! an injected sink; the caller owns the sink's lifecycle (file path, console
//! echo). This keeps the decoder free of any process-wide log destination and
//! lets embedders capture reports however they like.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;
use tracing::warn;

// ============================================================================
// EventLog Capability
// ============================================================================

/// Capability to append one report line
///
/// Implemented by the provided [`ReportLog`] sink, by [`FnLog`]-wrapped
/// closures, and by `Vec<String>` for in-memory capture.
pub trait EventLog {
    /// Appends one formatted message to the sink
    fn append(&mut self, message: &str);
}

/// Adapter turning any `FnMut(&str)` function value into an [`EventLog`] sink
pub struct FnLog<F>(pub F);

impl<F: FnMut(&str)> EventLog for FnLog<F> {
    fn append(&mut self, message: &str) {
        (self.0)(message);
    }
}

impl EventLog for Vec<String> {
    fn append(&mut self, message: &str) {
        self.push(message.to_string());
    }
}

// ============================================================================
// ReportLog Sink
// ============================================================================

/// Timestamping report sink writing to a file and/or the console.
///
/// Every message is prefixed with a local `%Y-%m-%d %H:%M:%S` timestamp.
/// File writes are best-effort: a failure is surfaced as a diagnostic
/// warning, never into the batch itself.
pub struct ReportLog {
    file: Option<PathBuf>,
    echo: bool,
}

impl ReportLog {
    /// Creates a sink appending to `file` (if given) and echoing to the
    /// console (if `echo`)
    pub fn new(file: Option<PathBuf>, echo: bool) -> Self {
        Self { file, echo }
    }

    /// Console-only sink
    pub fn console() -> Self {
        Self::new(None, true)
    }

    fn write_to_file(&self, line: &str) -> std::io::Result<()> {
        let Some(path) = &self.file else {
            return Ok(());
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", line)
    }
}

impl EventLog for ReportLog {
    fn append(&mut self, message: &str) {
        let line = format!("{} {}", Local::now().format("%Y-%m-%d %H:%M:%S"), message);

        if self.echo {
            println!("{}", line);
        }
        if let Err(e) = self.write_to_file(&line) {
            warn!("Failed to write report log: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fn_log_forwards_to_closure() {
        let mut collected: Vec<String> = Vec::new();
        {
            let mut sink = FnLog(|msg: &str| collected.push(msg.to_string()));
            let log: &mut dyn EventLog = &mut sink;
            log.append("first");
            log.append("second");
        }
        assert_eq!(collected, vec!["first", "second"]);
    }

    #[test]
    fn test_vec_sink_collects_messages() {
        let mut sink: Vec<String> = Vec::new();
        EventLog::append(&mut sink, "only line");
        assert_eq!(sink, vec!["only line"]);
    }

    #[test]
    fn test_report_log_appends_timestamped_lines() {
        let dir = std::env::temp_dir().join("clashlink-report-test");
        let path = dir.join("log.txt");
        let _ = fs::remove_file(&path);

        let mut log = ReportLog::new(Some(path.clone()), false);
        log.append("1 succeeded, 0 failed");
        log.append("next line");

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("1 succeeded, 0 failed"));
        // Timestamp prefix: "YYYY-MM-DD HH:MM:SS "
        assert_eq!(lines[0].as_bytes()[4], b'-');
        assert_eq!(lines[0].as_bytes()[10], b' ');

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_report_log_creates_parent_dirs() {
        let dir = std::env::temp_dir().join("clashlink-report-nested");
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("a").join("b").join("log.txt");

        let mut log = ReportLog::new(Some(path.clone()), false);
        log.append("hello");

        assert!(path.exists());
        let _ = fs::remove_dir_all(&dir);
    }
}
