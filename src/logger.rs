//! Reading event logger
//!
//! An owned logger (no global state) with verbosity filtering, text or JSON
//! line output, and optional in-memory capture so tests and presenters can
//! inspect what happened during a reading.

use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::ops::Deref;

/// How much the logger prints
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// No output
    Silent = 0,
    /// Only finished readings
    Minimal = 1,
    /// Step changes, shuffles, and draws (default)
    #[default]
    Normal = 2,
    /// Everything, including rejected actions
    Verbose = 3,
}

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// Machine-readable JSON output (one object per line)
    Json,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    #[default]
    Stdout,
    /// Capture only to in-memory buffer (no stdout)
    Memory,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    /// Event category (e.g., "shuffle", "draw", "flow")
    pub category: Option<String>,
}

/// Borrow of the capture buffer, usable as a `&[LogEntry]`
///
/// Holds the buffer's `RefCell` borrow; drop it before logging again.
pub struct LogGuard<'a>(Ref<'a, Vec<LogEntry>>);

impl Deref for LogGuard<'_> {
    type Target = [LogEntry];

    fn deref(&self) -> &[LogEntry] {
        self.0.as_slice()
    }
}

pub struct ReadingLogger {
    verbosity: VerbosityLevel,
    output_format: OutputFormat,
    output_mode: OutputMode,
    log_buffer: RefCell<Vec<LogEntry>>,
}

impl ReadingLogger {
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        ReadingLogger {
            verbosity,
            output_format: OutputFormat::default(),
            output_mode: OutputMode::default(),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    /// Logger that only captures (for tests)
    pub fn capturing() -> Self {
        let mut logger = Self::with_verbosity(VerbosityLevel::Verbose);
        logger.set_output_mode(OutputMode::Memory);
        logger
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.output_format = format;
    }

    /// Captured entries; derefs to `[LogEntry]`
    ///
    /// ```ignore
    /// let draws = logger.logs().iter()
    ///     .filter(|e| e.category.as_deref() == Some("draw"))
    ///     .count();
    /// ```
    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard(self.log_buffer.borrow())
    }

    pub fn clear_logs(&mut self) {
        self.log_buffer.borrow_mut().clear();
    }

    #[inline]
    pub fn minimal(&self, category: &str, message: &str) {
        self.log(VerbosityLevel::Minimal, category, message);
    }

    #[inline]
    pub fn normal(&self, category: &str, message: &str) {
        self.log(VerbosityLevel::Normal, category, message);
    }

    #[inline]
    pub fn verbose(&self, category: &str, message: &str) {
        self.log(VerbosityLevel::Verbose, category, message);
    }

    fn log(&self, level: VerbosityLevel, category: &str, message: &str) {
        let should_capture = self.is_capturing();
        let should_output = matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both)
            && level <= self.verbosity;

        if !should_capture && !should_output {
            return;
        }

        let entry = LogEntry {
            level,
            message: message.to_string(),
            category: Some(category.to_string()),
        };

        if should_output {
            self.write_line(&entry);
        }
        if should_capture {
            self.log_buffer.borrow_mut().push(entry);
        }
    }

    fn write_line(&self, entry: &LogEntry) {
        match self.output_format {
            OutputFormat::Text => {
                if entry.level == VerbosityLevel::Minimal {
                    println!("{}", entry.message);
                } else {
                    println!("  {}", entry.message);
                }
            }
            OutputFormat::Json => match serde_json::to_string(entry) {
                Ok(line) => println!("{line}"),
                Err(e) => eprintln!("failed to encode log entry: {e}"),
            },
        }
    }
}

impl Default for ReadingLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ReadingLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadingLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.log_buffer.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_capture_keeps_categories() {
        let logger = ReadingLogger::capturing();
        logger.normal("shuffle", "Shuffled 78 cards");
        logger.verbose("draw", "Slot 1 rejected");

        let logs = logger.logs();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].category.as_deref(), Some("shuffle"));
        assert_eq!(logs[1].level, VerbosityLevel::Verbose);
    }

    #[test]
    fn test_clear_logs() {
        let mut logger = ReadingLogger::capturing();
        logger.minimal("reading", "done");
        assert!(!logger.logs().is_empty());
        logger.clear_logs();
        assert!(logger.logs().is_empty());
    }

    #[test]
    fn test_stdout_mode_does_not_capture() {
        let mut logger = ReadingLogger::with_verbosity(VerbosityLevel::Silent);
        logger.set_output_mode(OutputMode::Stdout);
        logger.normal("flow", "hidden");
        assert!(logger.logs().is_empty());
        assert!(!logger.is_capturing());
    }

    #[test]
    fn test_capture_keeps_entries_above_verbosity() {
        let mut logger = ReadingLogger::with_verbosity(VerbosityLevel::Silent);
        logger.set_output_mode(OutputMode::Both);
        logger.verbose("draw", "Draw rejected");
        logger.minimal("reading", "Three Card reading complete");

        let levels: Vec<_> = logger.logs().iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![VerbosityLevel::Verbose, VerbosityLevel::Minimal]);
    }

    #[test]
    fn test_verbosity_ordering() {
        assert!(VerbosityLevel::Silent < VerbosityLevel::Minimal);
        assert!(VerbosityLevel::Normal < VerbosityLevel::Verbose);
        assert_eq!(VerbosityLevel::default(), VerbosityLevel::Normal);
    }
}
