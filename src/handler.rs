//! The error classifier.
//!
//! [`ErrorHandler::handle_error`] is the game's last line of defence: every
//! failure a gameplay module cannot recover from ends up here, and the game
//! loop prints whatever string comes back. It therefore never panics outward
//! and never returns an error. Bookkeeping (statistics, history, log sink)
//! runs under `catch_unwind`; if any of it blows up, the player still gets a
//! message.

use crate::convenience::{sanitize, sanitize_bounded};
use crate::messages::{resolve_message, BuiltinCatalog, Language, MessageCatalog};
use crate::ring_buffer::{ErrorEntry, ErrorHistory, DEFAULT_HISTORY_CAPACITY};
use crate::sink::{level_for_kind, LogSink};
use crate::stats::ErrorStatistics;
use crate::{definitions, ErrorCode, ErrorKind, GameError};
use chrono::{DateTime, Local};
use log::Level;
use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Upper bound on the description written for one failure.
const MAX_DESCRIPTION_LEN: usize = 4096;

// ============================================================================
// Configuration
// ============================================================================

/// Settings fixed when a handler is created.
///
/// ```rust
/// use saga_errors::{HandlerConfig, Language};
///
/// let config = HandlerConfig::new(true, Some("logs/game.log"))
///     .with_language(Language::Spanish)
///     .with_history_capacity(16);
/// assert!(config.debug_mode());
/// assert_eq!(config.history_capacity(), 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    debug_mode: bool,
    log_file: Option<PathBuf>,
    language: Language,
    history_capacity: usize,
}

impl HandlerConfig {
    /// Config with the given debug flag and optional log file.
    pub fn new(debug_mode: bool, log_file: Option<impl AsRef<Path>>) -> Self {
        Self {
            debug_mode,
            log_file: log_file.map(|p| p.as_ref().to_path_buf()),
            language: Language::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    /// Language of the built-in safe messages.
    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Language from a tag such as `"es-MX"`. Unknown tags keep the current
    /// language.
    #[must_use]
    pub fn with_language_tag(self, tag: &str) -> Self {
        match Language::from_tag(tag) {
            Some(language) => self.with_language(language),
            None => self,
        }
    }

    /// Number of recent failures kept in memory (minimum 1).
    #[must_use]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity.max(1);
        self
    }

    /// Whether debug lines are written.
    #[inline]
    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    /// Log file path, if any.
    #[inline]
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// Built-in catalog language.
    #[inline]
    pub fn language(&self) -> Language {
        self.language
    }

    /// Recent-error ring size.
    #[inline]
    pub fn history_capacity(&self) -> usize {
        self.history_capacity
    }
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self::new(false, None::<&Path>)
    }
}

// ============================================================================
// Error Record
// ============================================================================

/// One classification, alive only while `handle_error` runs.
///
/// The owned description is zeroized when the record drops.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ErrorRecord<'a> {
    #[zeroize(skip)]
    timestamp: DateTime<Local>,
    #[zeroize(skip)]
    kind: ErrorKind,
    #[zeroize(skip)]
    code: &'a ErrorCode,
    #[zeroize(skip)]
    context: &'a str,
    description: String,
    #[zeroize(skip)]
    fallback: &'a str,
}

impl<'a> ErrorRecord<'a> {
    /// Capture `err` now.
    pub fn capture(err: &'a GameError, context: &'a str, fallback: &'a str) -> Self {
        let mut raw = String::new();
        // Writing into a String cannot fail.
        let _ = err.internal_log().write_to(&mut raw);
        let description = sanitize_description(&raw);
        raw.zeroize();

        Self {
            timestamp: Local::now(),
            kind: err.kind(),
            code: err.code(),
            context,
            description,
            fallback,
        }
    }

    /// When the failure was captured.
    #[inline]
    pub fn timestamp(&self) -> &DateTime<Local> {
        &self.timestamp
    }

    /// Classified kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Code of the failure.
    #[inline]
    pub fn code(&self) -> &ErrorCode {
        self.code
    }

    /// Caller's context label.
    #[inline]
    pub fn context(&self) -> &str {
        self.context
    }

    /// Internal log text with control characters neutralized.
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Caller's fallback message.
    #[inline]
    pub fn fallback(&self) -> &str {
        self.fallback
    }

    /// Message part of the sink line: `(Kind) description`.
    pub fn sink_message(&self) -> String {
        format!("({}) {}", self.kind, self.description)
    }
}

impl fmt::Debug for ErrorRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorRecord")
            .field("timestamp", &self.timestamp)
            .field("kind", &self.kind)
            .field("code", self.code)
            .field("context", &self.context)
            .field("description", &"<REDACTED>")
            .finish()
    }
}

fn sanitize_description(raw: &str) -> String {
    sanitize_bounded(raw, MAX_DESCRIPTION_LEN)
}

// ============================================================================
// Handler
// ============================================================================

/// Classifies failures, keeps statistics and writes the log sink.
///
/// All methods take `&self`; internal state sits behind std locks with
/// poison recovery, so a handler can be shared across threads even though
/// the game itself drives it from one.
pub struct ErrorHandler {
    config: HandlerConfig,
    stats: Mutex<ErrorStatistics>,
    sink: Option<Mutex<LogSink>>,
    history: ErrorHistory,
    catalog: Box<dyn MessageCatalog>,
    sink_failures: AtomicU64,
}

impl ErrorHandler {
    /// Build a handler using the built-in catalog for `config.language()`.
    ///
    /// If the log file cannot be opened the handler runs without a sink and
    /// the failure is counted in [`sink_failures`](Self::sink_failures).
    pub fn new(config: HandlerConfig) -> Self {
        let catalog = BuiltinCatalog::new(config.language());
        Self::with_catalog(config, catalog)
    }

    /// Build a handler whose safe messages come from `catalog`.
    pub fn with_catalog(config: HandlerConfig, catalog: impl MessageCatalog + 'static) -> Self {
        let mut failures = 0;
        let sink = match config.log_file() {
            Some(path) => match LogSink::open(path) {
                Ok(sink) => Some(Mutex::new(sink)),
                Err(_) => {
                    failures += 1;
                    None
                }
            },
            None => None,
        };

        Self {
            history: ErrorHistory::new(config.history_capacity()),
            config,
            stats: Mutex::new(ErrorStatistics::new()),
            sink,
            catalog: Box::new(catalog),
            sink_failures: AtomicU64::new(failures),
        }
    }

    #[inline]
    fn lock_stats(&self) -> MutexGuard<'_, ErrorStatistics> {
        match self.stats.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Classify `err`, record it, and return the text to show the player.
    ///
    /// A `fallback` with any visible character is returned as-is; a blank
    /// fallback is replaced by the catalog's message for the failure's kind.
    ///
    /// ```rust
    /// use saga_errors::{definitions, ErrorHandler, GameError, HandlerConfig};
    ///
    /// let handler = ErrorHandler::new(HandlerConfig::default());
    /// let err = GameError::equipment(definitions::EQP_ITEM_NOT_FOUND, "equip", "no item 42");
    ///
    /// assert_eq!(handler.handle_error(&err, "equip item", ""), "That could not be found.");
    /// assert_eq!(handler.get_error_statistics().total_errors(), 1);
    /// ```
    pub fn handle_error(&self, err: &GameError, context: &str, fallback: &str) -> String {
        let kind = err.kind();

        // Bookkeeping failures are swallowed; the player message must survive.
        let _ = catch_unwind(AssertUnwindSafe(|| self.record(err, context, fallback)));

        match catch_unwind(AssertUnwindSafe(|| {
            resolve_message(fallback, kind, self.catalog.as_ref())
        })) {
            Ok(message) => message,
            Err(_) => resolve_message(fallback, kind, &BuiltinCatalog::default()),
        }
    }

    fn record(&self, err: &GameError, context: &str, fallback: &str) {
        let record = ErrorRecord::capture(err, context, fallback);

        self.lock_stats().record(record.kind());

        self.history.push(ErrorEntry::new(
            *record.timestamp(),
            record.code(),
            record.kind(),
            record.context(),
            record.description(),
        ));

        self.write_line(
            level_for_kind(record.kind()),
            record.timestamp(),
            Some(record.context()),
            &record.sink_message(),
        );
    }

    /// Run `op`, routing any failure through [`handle_error`](Self::handle_error).
    ///
    /// A panic inside `op` is recovered and classified as
    /// `CORE_PANIC_RECOVERED`. On failure the `Err` holds the player message.
    pub fn run_guarded<T, F>(&self, context: &str, fallback: &str, op: F) -> Result<T, String>
    where
        F: FnOnce() -> crate::Result<T>,
    {
        match catch_unwind(AssertUnwindSafe(op)) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(self.handle_error(&err, context, fallback)),
            Err(payload) => {
                let err = GameError::state(
                    definitions::CORE_PANIC_RECOVERED,
                    "run_guarded",
                    sanitize(panic_message(payload.as_ref())),
                );
                Err(self.handle_error(&err, context, fallback))
            }
        }
    }

    /// Append `[timestamp] [DEBUG] message` when debug mode is on.
    pub fn log_debug(&self, message: &str) {
        if !self.config.debug_mode() {
            return;
        }
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.write_line(Level::Debug, &Local::now(), None, message);
        }));
    }

    fn write_line(&self, level: Level, timestamp: &DateTime<Local>, context: Option<&str>, message: &str) {
        let Some(sink) = &self.sink else {
            return;
        };
        let mut sink = match sink.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Err(io_err) = sink.write_entry(level, timestamp, context, message) {
            self.sink_failures.fetch_add(1, Ordering::Relaxed);
            if self.config.debug_mode() {
                let note = format!("[{}] log sink write failed: {}", definitions::CORE_LOG_SINK_FAILED, io_err.kind());
                if sink.write_entry(Level::Debug, &Local::now(), None, &note).is_err() {
                    self.sink_failures.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
    }

    /// Snapshot of the statistics.
    pub fn get_error_statistics(&self) -> ErrorStatistics {
        self.lock_stats().clone()
    }

    /// Whether debug mode is on.
    #[inline]
    pub fn is_debug_mode(&self) -> bool {
        self.config.debug_mode()
    }

    /// Settings the handler was built with.
    #[inline]
    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Whether a log file is open.
    #[inline]
    pub fn has_log_sink(&self) -> bool {
        self.sink.is_some()
    }

    /// Failed sink opens and writes since creation.
    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    /// Up to `n` recent failures, newest first.
    pub fn recent_errors(&self, n: usize) -> Vec<ErrorEntry> {
        self.history.recent(n)
    }

    /// Recent failures of one kind, newest first.
    pub fn recent_errors_of_kind(&self, kind: ErrorKind) -> Vec<ErrorEntry> {
        self.history.of_kind(kind)
    }

    /// Forget the recent-failure history. Statistics and the eviction count
    /// are kept.
    pub fn clear_history(&self) {
        self.history.clear();
    }

    /// Failures dropped from the history to make room.
    #[inline]
    pub fn eviction_count(&self) -> u64 {
        self.history.eviction_count()
    }
}

impl fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorHandler")
            .field("config", &self.config)
            .field("stats", &*self.lock_stats())
            .field("history", &self.history)
            .field("sink_failures", &self.sink_failures())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "panic with non-string payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::fs;

    fn handler_with_log(debug: bool) -> (tempfile::TempDir, PathBuf, ErrorHandler) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.log");
        let handler = ErrorHandler::new(HandlerConfig::new(debug, Some(&path)));
        (dir, path, handler)
    }

    struct PanickingCatalog;

    impl MessageCatalog for PanickingCatalog {
        fn safe_message(&self, _kind: ErrorKind) -> Cow<'static, str> {
            panic!("catalog exploded")
        }
    }

    #[test]
    fn handler_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ErrorHandler>();
    }

    #[test]
    fn fallback_is_returned_and_counted() {
        let handler = ErrorHandler::new(HandlerConfig::default());
        let err = GameError::save(definitions::SAV_FILE_MISSING, "load_save", "slot 1 empty");

        let shown = handler.handle_error(&err, "load save", "Save file not found.");

        assert_eq!(shown, "Save file not found.");
        let stats = handler.get_error_statistics();
        assert_eq!(stats.total_errors(), 1);
        assert_eq!(stats.count(ErrorKind::NotFound), 1);
    }

    #[test]
    fn sink_line_has_level_context_kind_and_description() {
        let (_dir, path, handler) = handler_with_log(false);
        let err = GameError::combat(definitions::CMB_ACTOR_DEFEATED, "resolve_turn", "actor has 0 hp");
        handler.handle_error(&err, "combat turn", "You can't do that now.");

        let input = GameError::input(definitions::INP_NOT_A_NUMBER, "read_choice", "abc");
        handler.handle_error(&input, "main menu", "Please enter a number.");
        drop(handler);

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].contains("] [ERROR] combat turn: (StateError) [E-CMB-203]"));
        assert!(lines[0].contains("details='actor has 0 hp'"));
        assert!(lines[1].contains("] [WARN] main menu: (InvalidInput) [E-INP-101]"));
    }

    #[test]
    fn multiline_details_stay_on_one_line() {
        let (_dir, path, handler) = handler_with_log(false);
        let err = GameError::event(definitions::EVT_OUTCOME_INVALID, "apply_outcome", "line one\nline two");
        handler.handle_error(&err, "event", "");
        drop(handler);

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.contains("line one?line two"));
    }

    #[test]
    fn debug_log_only_in_debug_mode() {
        let (_dir, path, quiet) = handler_with_log(false);
        quiet.log_debug("entering shop");
        drop(quiet);
        assert_eq!(fs::read_to_string(&path).unwrap(), "");

        let (_dir, path, chatty) = handler_with_log(true);
        chatty.log_debug("entering shop");
        drop(chatty);
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.trim_end().ends_with("] [DEBUG] entering shop"));
    }

    #[test]
    fn unopenable_sink_degrades_to_no_sink() {
        let dir = tempfile::tempdir().unwrap();
        let handler = ErrorHandler::new(HandlerConfig::new(true, Some(dir.path())));

        assert!(!handler.has_log_sink());
        assert_eq!(handler.sink_failures(), 1);

        let err = GameError::save(definitions::SAV_WRITE_FAILED, "write_save", "disk full");
        assert_eq!(handler.handle_error(&err, "save game", "Could not save."), "Could not save.");
        assert_eq!(handler.get_error_statistics().total_errors(), 1);
    }

    #[test]
    fn panicking_catalog_falls_back_to_builtin() {
        let handler = ErrorHandler::with_catalog(HandlerConfig::default(), PanickingCatalog);
        let err = GameError::combat(definitions::CMB_FORMULA_FAILED, "roll", "nan");

        let shown = handler.handle_error(&err, "combat", "");
        assert_eq!(shown, "Sorry, something unexpected happened.");
        assert_eq!(handler.get_error_statistics().count(ErrorKind::Unknown), 1);
    }

    #[test]
    fn language_selects_builtin_catalog() {
        let handler = ErrorHandler::new(HandlerConfig::default().with_language(Language::Spanish));
        let err = GameError::language(definitions::LNG_KEY_MISSING, "lookup", "menu.title");
        assert_eq!(handler.handle_error(&err, "menu", " "), "No se pudo encontrar.");
    }

    #[test]
    fn run_guarded_passes_values_through() {
        let handler = ErrorHandler::new(HandlerConfig::default());
        assert_eq!(handler.run_guarded("roll", "", || Ok(6)), Ok(6));
        assert!(handler.get_error_statistics().is_empty());
    }

    #[test]
    fn run_guarded_routes_errors() {
        let handler = ErrorHandler::new(HandlerConfig::default());
        let result: Result<(), String> = handler.run_guarded("equip", "Can't equip that.", || {
            Err(GameError::equipment(definitions::EQP_SLOT_OCCUPIED, "equip", "hands full"))
        });
        assert_eq!(result, Err(String::from("Can't equip that.")));
        assert_eq!(handler.get_error_statistics().count(ErrorKind::StateError), 1);
    }

    #[test]
    fn run_guarded_recovers_panics() {
        let handler = ErrorHandler::new(HandlerConfig::default());
        let result: Result<u32, String> = handler.run_guarded("combat", "", || panic!("divide by zero"));

        assert_eq!(result, Err(String::from("Sorry, something unexpected happened.")));
        assert_eq!(handler.get_error_statistics().count(ErrorKind::Unknown), 1);

        let recent = handler.recent_errors(1);
        assert_eq!(&*recent[0].code, "E-CORE-003");
        assert!(recent[0].description.contains("divide by zero"));
    }

    #[test]
    fn history_is_bounded() {
        let handler = ErrorHandler::new(HandlerConfig::default().with_history_capacity(2));
        for i in 0..5 {
            let err = GameError::combat(definitions::CMB_TARGET_NOT_FOUND, "attack", format!("target {}", i));
            handler.handle_error(&err, "attack", "");
        }

        let recent = handler.recent_errors(10);
        assert_eq!(recent.len(), 2);
        assert!(recent[0].description.contains("target 4"));
        assert_eq!(handler.eviction_count(), 3);
        assert_eq!(handler.get_error_statistics().total_errors(), 5);
    }

    #[test]
    fn record_debug_redacts_description() {
        let err = GameError::save(definitions::SAV_CORRUPTED, "load", "checksum mismatch");
        let record = ErrorRecord::capture(&err, "load save", "");
        assert!(record.description().contains("checksum mismatch"));
        assert!(!format!("{:?}", record).contains("checksum"));
        assert_eq!(record.sink_message().split(' ').next(), Some("(StateError)"));
    }

    #[test]
    fn arrow_keys_in_player_input_keep_the_description() {
        let (_dir, path, handler) = handler_with_log(false);
        let err = GameError::input(
            definitions::INP_UNKNOWN_COMMAND,
            "parse_command",
            "unknown command \x1b[Anorth to the forest gate (player id 7)",
        );
        handler.handle_error(&err, "parse command", "");

        let recent = handler.recent_errors(1);
        assert!(recent[0].description.contains("?north to the forest gate (player id 7)'"));
        drop(handler);
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("forest gate (player id 7)'"));
    }

    #[test]
    fn history_can_be_filtered_and_cleared() {
        let handler = ErrorHandler::new(HandlerConfig::default());
        let missing = GameError::save(definitions::SAV_FILE_MISSING, "load_save", "slot 2 empty");
        let typo = GameError::input(definitions::INP_UNKNOWN_COMMAND, "parse_command", "jmup");
        handler.handle_error(&missing, "load save", "");
        handler.handle_error(&typo, "parse command", "");
        handler.handle_error(&typo, "parse command", "");

        assert_eq!(handler.recent_errors_of_kind(ErrorKind::InvalidInput).len(), 2);
        assert_eq!(handler.recent_errors_of_kind(ErrorKind::NotFound).len(), 1);
        assert!(handler.recent_errors_of_kind(ErrorKind::IOFailure).is_empty());

        handler.clear_history();
        assert!(handler.recent_errors(10).is_empty());
        assert_eq!(handler.get_error_statistics().total_errors(), 3);
    }

    #[test]
    fn language_tag_selects_catalog() {
        let config = HandlerConfig::default().with_language_tag("es-MX");
        assert_eq!(config.language(), Language::Spanish);
        let config = config.with_language_tag("klingon");
        assert_eq!(config.language(), Language::Spanish);
    }

    #[test]
    fn config_history_capacity_has_floor() {
        assert_eq!(HandlerConfig::default().with_history_capacity(0).history_capacity(), 1);
        assert_eq!(HandlerConfig::default().history_capacity(), DEFAULT_HISTORY_CAPACITY);
    }
}
