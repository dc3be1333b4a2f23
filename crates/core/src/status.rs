//! User-visible status: one banner plus an append-only, timestamped log.
//!
//! Every banner change and log line is also emitted as a `tracing`
//! event so the same information reaches the process log.

use std::fmt;

use serde::Serialize;

use crate::types::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Info,
    Ok,
    Warn,
    Bad,
}

impl StatusLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusLevel::Info => "info",
            StatusLevel::Ok => "ok",
            StatusLevel::Warn => "warn",
            StatusLevel::Bad => "bad",
        }
    }
}

impl fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Banner {
    pub level: StatusLevel,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub at: Timestamp,
    pub line: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.at.format("%H:%M:%S"), self.line)
    }
}

#[derive(Debug, Default, Serialize)]
pub struct StatusBoard {
    banner: Option<Banner>,
    log: Vec<LogEntry>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the banner.
    pub fn set(&mut self, level: StatusLevel, text: impl Into<String>) {
        let text = text.into();
        match level {
            StatusLevel::Info | StatusLevel::Ok => tracing::info!(level = %level, "{text}"),
            StatusLevel::Warn => tracing::warn!(level = %level, "{text}"),
            StatusLevel::Bad => tracing::error!(level = %level, "{text}"),
        }
        self.banner = Some(Banner { level, text });
    }

    /// Append a line to the log.
    pub fn log(&mut self, line: impl Into<String>) {
        let line = line.into();
        tracing::debug!(target: "twin_core::status::log", "{line}");
        self.log.push(LogEntry {
            at: chrono::Utc::now(),
            line,
        });
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_is_replaced_log_is_appended() {
        let mut board = StatusBoard::new();
        board.set(StatusLevel::Info, "Encoding photos");
        board.log("first");
        board.set(StatusLevel::Bad, "Request failed");
        board.log("second");

        assert_eq!(board.banner().unwrap().level, StatusLevel::Bad);
        assert_eq!(board.banner().unwrap().text, "Request failed");
        let lines: Vec<_> = board.entries().iter().map(|e| e.line.as_str()).collect();
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn log_entry_display_has_time_prefix() {
        let mut board = StatusBoard::new();
        board.log("hello");
        let shown = board.entries()[0].to_string();
        assert!(shown.starts_with('['));
        assert!(shown.ends_with("] hello"));
    }
}
