//! # Saga Errors
//!
//! Error classification and input validation for a text-driven role-playing game.
//!
//! Every gameplay module (combat, equipment, events, save/load, language
//! lookup) reports failures as a [`GameError`]. A single [`ErrorHandler`]
//! turns those failures into safe player-facing text, writes a diagnostic line
//! to the log sink and keeps per-kind statistics. Raw keyboard input is
//! checked by the [`validators`] before it ever reaches game logic.
//!
//! ## Design Philosophy
//!
//! 1. **The game never crashes on a failure** - the classifier is the catch-all boundary
//! 2. **Players see friendly text**, the log sees full context
//! 3. **Classification is decided by the error code**, so it is total at compile time
//! 4. **Bad input is a typed result**, never a panic and never silently coerced
//!
//! ## Quick Start
//!
//! ```rust
//! use saga_errors::{GameError, HandlerRegistry, definitions, ErrorKind, Result};
//!
//! fn load_save(slot: u8) -> Result<()> {
//!     Err(GameError::save(
//!         definitions::SAV_FILE_MISSING,
//!         "load_save",
//!         "No save in requested slot",
//!     ))
//! }
//!
//! let mut registry = HandlerRegistry::new();
//! let handler = registry.init_error_handler(false, None);
//!
//! if let Err(err) = load_save(1) {
//!     let shown = handler.handle_error(&err, "load save", "Save file not found.");
//!     assert_eq!(shown, "Save file not found.");
//! }
//!
//! let stats = handler.get_error_statistics();
//! assert_eq!(stats.total_errors(), 1);
//! assert_eq!(stats.count(ErrorKind::NotFound), 1);
//! ```
//!
//! ## Validating Input
//!
//! ```rust
//! use saga_errors::{validate_input, validate_numeric_input};
//!
//! assert_eq!(validate_numeric_input(" 7 ", 1, 10), Ok(7));
//! assert!(validate_numeric_input("15", 1, 10).is_err());
//! assert!(validate_input("2", &["1", "2", "3"], false));
//! ```
//!
//! ## Features
//!
//! - `trusted_debug`: write sensitive sources (file paths) into the log sink unredacted

#![warn(missing_docs)]
#![warn(clippy::all)]

use smallvec::SmallVec;
use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::io;
use std::result;
use zeroize::Zeroize;

pub mod codes;
pub mod convenience;
pub mod definitions;
pub mod handler;
pub mod logging;
pub mod messages;
pub mod registry;
pub mod ring_buffer;
pub mod sink;
pub mod stats;
pub mod validators;

pub use codes::*;
pub use convenience::*;
pub use definitions::*;
pub use handler::*;
pub use logging::*;
pub use messages::*;
pub use registry::*;
pub use ring_buffer::*;
pub use sink::*;
pub use stats::*;
pub use validators::*;

/// Type alias for Results using our error type.
pub type Result<T> = result::Result<T, GameError>;

// ============================================================================
// Internal Error Context
// ============================================================================

struct ErrorContext {
    operation: Cow<'static, str>,
    details: Cow<'static, str>,
    source_internal: Option<Cow<'static, str>>,
    source_sensitive: Option<Cow<'static, str>>,
    metadata: SmallVec<[(&'static str, ContextField); 4]>,
}

impl ErrorContext {
    #[inline]
    fn new(operation: impl Into<Cow<'static, str>>, details: impl Into<Cow<'static, str>>) -> Self {
        Self {
            operation: operation.into(),
            details: details.into(),
            source_internal: None,
            source_sensitive: None,
            metadata: SmallVec::new(),
        }
    }
}

impl Zeroize for ErrorContext {
    fn zeroize(&mut self) {
        if let Cow::Owned(ref mut s) = self.operation {
            s.zeroize();
        }
        if let Cow::Owned(ref mut s) = self.details {
            s.zeroize();
        }
        if let Some(Cow::Owned(ref mut s)) = self.source_internal {
            s.zeroize();
        }
        if let Some(Cow::Owned(ref mut s)) = self.source_sensitive {
            s.zeroize();
        }
        for (_, value) in &mut self.metadata {
            value.zeroize();
        }
        self.metadata.clear();
    }
}

impl Drop for ErrorContext {
    fn drop(&mut self) {
        self.zeroize();
    }
}

#[inline]
const fn io_error_kind_label(kind: io::ErrorKind) -> &'static str {
    match kind {
        io::ErrorKind::NotFound => "NotFound",
        io::ErrorKind::PermissionDenied => "PermissionDenied",
        io::ErrorKind::AlreadyExists => "AlreadyExists",
        io::ErrorKind::InvalidInput => "InvalidInput",
        io::ErrorKind::InvalidData => "InvalidData",
        io::ErrorKind::WriteZero => "WriteZero",
        io::ErrorKind::Interrupted => "Interrupted",
        io::ErrorKind::UnexpectedEof => "UnexpectedEof",
        io::ErrorKind::Unsupported => "Unsupported",
        io::ErrorKind::OutOfMemory => "OutOfMemory",
        io::ErrorKind::Other => "Other",
        _ => "Unknown",
    }
}

// ============================================================================
// Game Error
// ============================================================================

/// The structured failure value every gameplay module returns.
///
/// # Key Properties
///
/// - Classified into exactly one [`ErrorKind`] at construction
/// - `Display` is safe to show a player; `Debug` redacts context
/// - Full context is available only through [`GameError::internal_log`]
/// - Owned context strings are zeroized on drop
///
/// Subsystem constructors (`combat`, `save`, ...) exist so call sites read as
/// what failed, and so `grep "::save("` finds every save failure. In debug
/// builds they assert the code belongs to the matching namespace.
#[must_use = "errors should be handled or logged"]
pub struct GameError {
    code: ErrorCode,
    kind: ErrorKind,
    context: ErrorContext,
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl GameError {
    #[inline]
    fn new(code: ErrorCode, operation: impl Into<Cow<'static, str>>, details: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind: code.kind(),
            code,
            context: ErrorContext::new(operation, details),
            source: None,
        }
    }

    #[inline]
    fn in_namespace(
        namespace: &'static str,
        code: ErrorCode,
        operation: impl Into<Cow<'static, str>>,
        details: impl Into<Cow<'static, str>>,
    ) -> Self {
        debug_assert_eq!(
            code.namespace().as_str(),
            namespace,
            "error code {} used with the wrong subsystem constructor",
            code
        );
        Self::new(code, operation, details)
    }

    /// Create a combat error.
    #[inline]
    pub fn combat(
        code: ErrorCode,
        operation: impl Into<Cow<'static, str>>,
        details: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::in_namespace("CMB", code, operation, details)
    }

    /// Create an equipment error.
    #[inline]
    pub fn equipment(
        code: ErrorCode,
        operation: impl Into<Cow<'static, str>>,
        details: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::in_namespace("EQP", code, operation, details)
    }

    /// Create an event error.
    #[inline]
    pub fn event(
        code: ErrorCode,
        operation: impl Into<Cow<'static, str>>,
        details: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::in_namespace("EVT", code, operation, details)
    }

    /// Create a save/load error.
    #[inline]
    pub fn save(
        code: ErrorCode,
        operation: impl Into<Cow<'static, str>>,
        details: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::in_namespace("SAV", code, operation, details)
    }

    /// Create a language lookup error.
    #[inline]
    pub fn language(
        code: ErrorCode,
        operation: impl Into<Cow<'static, str>>,
        details: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::in_namespace("LNG", code, operation, details)
    }

    /// Create a player input error.
    #[inline]
    pub fn input(
        code: ErrorCode,
        operation: impl Into<Cow<'static, str>>,
        details: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::in_namespace("INP", code, operation, details)
    }

    /// Create a core error (handler lifecycle, invariant violations).
    #[inline]
    pub fn state(
        code: ErrorCode,
        operation: impl Into<Cow<'static, str>>,
        details: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::in_namespace("CORE", code, operation, details)
    }

    /// Wrap an `io::Error` raised while touching `path`.
    ///
    /// The io error kind is kept as internal source and the path as sensitive
    /// source, so the sink can redact one without losing the other. A missing
    /// file is always classified `NotFound`, whatever kind `code` carries.
    pub fn from_io_path(
        code: ErrorCode,
        operation: impl Into<Cow<'static, str>>,
        path: impl Into<Cow<'static, str>>,
        error: io::Error,
    ) -> Self {
        let io_kind = error.kind();
        let mut err = Self::new(code, operation, "I/O operation failed");
        if io_kind == io::ErrorKind::NotFound {
            err.kind = ErrorKind::NotFound;
        }
        err.context.source_internal = Some(Cow::Borrowed(io_error_kind_label(io_kind)));
        err.context.source_sensitive = Some(path.into());
        err.source = Some(Box::new(error));
        err
    }

    /// Wrap a failure from code that does not speak `GameError`.
    ///
    /// `io::Error`s are classified by their io kind; anything else is `Unknown`.
    /// The foreign error's own message becomes the details.
    pub fn foreign<E>(operation: impl Into<Cow<'static, str>>, error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        let boxed: Box<dyn Error + Send + Sync> = Box::new(error);
        let (code, kind, label) = match boxed.downcast_ref::<io::Error>() {
            Some(io_err) => (
                definitions::CORE_FOREIGN_IO,
                ErrorKind::from_io_kind(io_err.kind()),
                io_error_kind_label(io_err.kind()),
            ),
            None => (definitions::CORE_UNCLASSIFIED, ErrorKind::Unknown, "unclassified"),
        };

        let mut err = Self::new(code, operation, boxed.to_string());
        err.kind = kind;
        err.context.source_internal = Some(Cow::Borrowed(label));
        err.source = Some(boxed);
        err
    }

    /// Attach a sensitive source (file path, player name) kept out of untrusted logs.
    #[inline]
    pub fn with_sensitive(mut self, sensitive: impl Into<Cow<'static, str>>) -> Self {
        self.context.source_sensitive = Some(sensitive.into());
        self
    }

    /// Attach the underlying error for `Error::source` chains.
    #[inline]
    pub fn with_source(mut self, source: impl Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Add diagnostic metadata (slot number, item id, event id).
    #[inline]
    pub fn with_metadata(mut self, key: &'static str, value: impl Into<Cow<'static, str>>) -> Self {
        self.context.metadata.push((key, ContextField::from(value.into())));
        self
    }

    /// The kind this failure is classified into.
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get error code.
    #[inline]
    pub const fn code(&self) -> &ErrorCode {
        &self.code
    }

    /// Player-facing name of the subsystem that failed.
    #[inline]
    pub const fn subsystem(&self) -> &'static str {
        self.code.namespace().display_name()
    }

    /// Borrowed structured view for the log sink.
    ///
    /// The view cannot outlive the error, so nothing retains the context
    /// after the error is dropped and zeroized.
    #[inline]
    pub fn internal_log(&self) -> InternalLog<'_> {
        InternalLog {
            code: &self.code,
            kind: self.kind,
            operation: self.context.operation.as_ref(),
            details: self.context.details.as_ref(),
            source_internal: self.context.source_internal.as_deref(),
            source_sensitive: self.context.source_sensitive.as_deref(),
            metadata: &self.context.metadata,
        }
    }

    /// Callback-style access to the internal log.
    #[inline]
    pub fn with_internal_log<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&InternalLog<'_>) -> R,
    {
        let log = self.internal_log();
        f(&log)
    }
}

impl Drop for GameError {
    #[inline(never)]
    fn drop(&mut self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.source = None;
            self.context.zeroize();
        }));
    }
}

impl fmt::Debug for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameError")
            .field("code", &self.code)
            .field("kind", &self.kind)
            .field("context", &"<REDACTED>")
            .field("source", &self.source.as_ref().map(|_| "<PRESENT>"))
            .finish()
    }
}

impl fmt::Display for GameError {
    /// Player-safe display: "{Subsystem} operation failed ({ERROR-CODE})".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} operation failed ({})", self.subsystem(), self.code)
    }
}

impl Error for GameError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}
