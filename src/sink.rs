//! Append-only plain-text log sink.
//!
//! One line per record:
//!
//! ```text
//! [2026-10-17 21:04:11.532] [ERROR] load save: (NotFound) [E-SAV-500] kind=NotFound operation='load_save' ...
//! [2026-10-17 21:04:12.007] [DEBUG] entering shop menu
//! ```
//!
//! Context and message are passed through [`sanitize_bounded`] so a player
//! typing newlines or escape sequences cannot forge extra lines. Empty fields
//! are written as-is. Levels are [`log::Level`]; only `DEBUG`, `WARN` and
//! `ERROR` are ever written.

use crate::convenience::sanitize_bounded;
use crate::ErrorKind;
use chrono::{DateTime, Local};
use log::Level;
use std::borrow::Cow;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};

/// `chrono` format used for every timestamp in the sink.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Upper bound for the context and message parts of a line.
const MAX_LINE_FIELD_LEN: usize = 4096;

/// Level used for a classified failure: `WARN` for player-caused failures,
/// `ERROR` for everything else. Debug-mode notes use [`Level::Debug`].
pub const fn level_for_kind(kind: ErrorKind) -> Level {
    if kind.is_player_caused() { Level::Warn } else { Level::Error }
}

/// Sanitize one line field. Empty stays empty rather than becoming a marker.
fn line_field(text: &str) -> Cow<'_, str> {
    if text.is_empty() {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(sanitize_bounded(text, MAX_LINE_FIELD_LEN))
    }
}

/// Render one sink line (without the trailing newline).
pub fn format_line(
    level: Level,
    timestamp: &DateTime<Local>,
    context: Option<&str>,
    message: &str,
) -> String {
    let message = line_field(message);
    match context {
        Some(context) => format!(
            "[{}] [{}] {}: {}",
            timestamp.format(TIMESTAMP_FORMAT),
            level.as_str(),
            line_field(context),
            message
        ),
        None => format!("[{}] [{}] {}", timestamp.format(TIMESTAMP_FORMAT), level.as_str(), message),
    }
}

/// File-backed sink, opened in append mode and closed on drop.
pub struct LogSink {
    path: PathBuf,
    writer: LineWriter<File>,
}

impl LogSink {
    /// Open (or create) the log file, creating parent directories as needed.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: LineWriter::new(file),
        })
    }

    /// Path the sink writes to.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record.
    pub fn write_entry(
        &mut self,
        level: Level,
        timestamp: &DateTime<Local>,
        context: Option<&str>,
        message: &str,
    ) -> io::Result<()> {
        let line = format_line(level, timestamp, context, message);
        writeln!(self.writer, "{}", line)
    }

    /// Push buffered bytes to the file.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl fmt::Debug for LogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogSink").field("path", &self.path).finish()
    }
}
