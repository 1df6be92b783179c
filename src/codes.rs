//! Error code namespace - enables error tracking without showing internals to the player.
//!
//! When a save fails, the player sees: "Save operation failed (E-SAV-500)".
//! Internally, we log full context. Externally, we reveal only subsystem and code.
//!
//! # Namespace Structure
//!
//! - **CORE**: Handler lifecycle, invariant violations, panic recovery
//! - **INP**: Raw player input validation
//! - **CMB**: Combat resolution
//! - **EQP**: Equipment and inventory
//! - **EVT**: Event tables and story events
//! - **SAV**: Save-file load and store
//! - **LNG**: Language pack lookup
//!
//! # Governance
//!
//! Namespaces are enforced at compile-time via the `ErrorNamespace` type with
//! private fields. Nobody can invent a namespace at runtime, so the taxonomy
//! stays closed.
//!
//! Every code carries exactly one [`ErrorKind`]. Classification of a failure is
//! therefore decided when the code is defined, not when the failure is caught:
//! the mapping from failure to kind is total and checked by the compiler.
//!
//! # Example Usage
//!
//! ```rust
//! use saga_errors::{ErrorCode, ErrorKind, define_error_codes, namespaces};
//!
//! define_error_codes! {
//!     &namespaces::SAV => {
//!         SAV_SLOT_LOCKED = (580, StateError),
//!         SAV_SLOT_GONE = (581, NotFound),
//!     }
//! }
//!
//! fn report(code: &ErrorCode) {
//!     println!("Error: {}", code);
//! }
//!
//! report(&SAV_SLOT_LOCKED);
//! assert_eq!(SAV_SLOT_GONE.kind(), ErrorKind::NotFound);
//! ```

use std::fmt;
use std::io;

// ============================================================================
// Error Kind (Closed Taxonomy)
// ============================================================================

/// The closed set of categories every failure is classified into.
///
/// New kinds are added here by name; there is no stringly-typed escape hatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
    /// A resource the game expected is missing (save file, item, event, language key).
    NotFound,
    /// Malformed or out-of-range player input.
    InvalidInput,
    /// An invariant of the game state was violated.
    StateError,
    /// Reading or writing a file failed for a reason other than absence.
    IOFailure,
    /// Anything we could not classify.
    Unknown,
}

impl ErrorKind {
    /// Every kind, in taxonomy order.
    pub const ALL: [ErrorKind; 5] = [
        Self::NotFound,
        Self::InvalidInput,
        Self::StateError,
        Self::IOFailure,
        Self::Unknown,
    ];

    /// Stable label used in log lines and summaries.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::InvalidInput => "InvalidInput",
            Self::StateError => "StateError",
            Self::IOFailure => "IOFailure",
            Self::Unknown => "Unknown",
        }
    }

    /// Map an `io::ErrorKind` onto the taxonomy.
    ///
    /// Absence is `NotFound`, rejected data is `InvalidInput`, everything else
    /// that comes out of the filesystem is an `IOFailure`.
    #[inline]
    pub const fn from_io_kind(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData => Self::InvalidInput,
            _ => Self::IOFailure,
        }
    }

    /// Whether failures of this kind are caused by the player rather than the game.
    #[inline]
    pub const fn is_player_caused(&self) -> bool {
        matches!(self, Self::InvalidInput)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Error Namespace (Frozen Identity)
// ============================================================================

/// Error namespace type - enforces frozen taxonomy.
///
/// The private field prevents construction outside this module; only the
/// consts in [`namespaces`] exist. The type is neither `Copy` nor `Clone`.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ErrorNamespace {
    name: &'static str,
    display_name: &'static str,
    _private: (),
}

impl ErrorNamespace {
    #[doc(hidden)]
    pub const fn __internal_new(name: &'static str, display_name: &'static str) -> Self {
        Self {
            name,
            display_name,
            _private: (),
        }
    }

    /// Short tag used inside error codes (`SAV`, `CMB`, ...).
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.name
    }

    /// Player-facing subsystem name ("Save", "Combat", ...).
    #[inline]
    pub const fn display_name(&self) -> &'static str {
        self.display_name
    }
}

/// Canonical namespace instances.
///
/// These are the **only** `ErrorNamespace` values that can exist.
pub mod namespaces {
    use super::ErrorNamespace;

    /// Handler lifecycle, invariant violations, panic recovery.
    pub const CORE: ErrorNamespace = ErrorNamespace::__internal_new("CORE", "Game");

    /// Raw player input validation.
    pub const INP: ErrorNamespace = ErrorNamespace::__internal_new("INP", "Input");

    /// Combat resolution.
    pub const CMB: ErrorNamespace = ErrorNamespace::__internal_new("CMB", "Combat");

    /// Equipment and inventory.
    pub const EQP: ErrorNamespace = ErrorNamespace::__internal_new("EQP", "Equipment");

    /// Event tables and story events.
    pub const EVT: ErrorNamespace = ErrorNamespace::__internal_new("EVT", "Event");

    /// Save-file load and store.
    pub const SAV: ErrorNamespace = ErrorNamespace::__internal_new("SAV", "Save");

    /// Language pack lookup.
    pub const LNG: ErrorNamespace = ErrorNamespace::__internal_new("LNG", "Language");
}

// ============================================================================
// Kind Policy
// ============================================================================

mod kind_policy {
    use super::ErrorKind;

    /// Input codes describe rejected player input and nothing else.
    pub(super) const fn input_permits(kind: ErrorKind) -> bool {
        matches!(kind, ErrorKind::InvalidInput)
    }

    /// Combat, equipment and events are pure game logic: no file I/O.
    pub(super) const fn gameplay_permits(kind: ErrorKind) -> bool {
        !matches!(kind, ErrorKind::IOFailure)
    }
}

/// Validate that a namespace permits the given error kind.
///
/// - INP: only `InvalidInput`
/// - CMB / EQP / EVT: anything but `IOFailure`
/// - CORE / SAV / LNG: any kind
pub const fn permits_kind(namespace: &ErrorNamespace, kind: ErrorKind) -> bool {
    match namespace.name.as_bytes() {
        b"INP" => kind_policy::input_permits(kind),
        b"CMB" | b"EQP" | b"EVT" => kind_policy::gameplay_permits(kind),
        _ => true,
    }
}

// ============================================================================
// Error Code Violations
// ============================================================================

/// Runtime error code construction failure.
///
/// Contains taxonomy details; use `.to_public()` before showing it to a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalErrorCodeViolation {
    /// Code is zero or exceeds 999.
    CodeOutOfRange { value: u16 },
    /// Kind not permitted for namespace.
    KindNotPermitted {
        namespace: &'static str,
        kind: &'static str,
    },
}

impl InternalErrorCodeViolation {
    /// Player-safe message without namespace policy details.
    pub fn to_public(&self) -> &'static str {
        match self {
            Self::CodeOutOfRange { .. } => "Invalid error code format",
            Self::KindNotPermitted { .. } => "Invalid error configuration",
        }
    }
}

impl fmt::Display for InternalErrorCodeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CodeOutOfRange { value } => {
                write!(f, "Error code {} is out of range (must be 001-999)", value)
            }
            Self::KindNotPermitted { namespace, kind } => {
                write!(f, "Kind {} not permitted for namespace {}", kind, namespace)
            }
        }
    }
}

impl std::error::Error for InternalErrorCodeViolation {}

// ============================================================================
// Error Code (Primary Identity Type)
// ============================================================================

/// An error code with namespace, numeric code and error kind.
///
/// Codes follow the format `E-XXX-YYY` where `XXX` is the namespace and
/// `YYY` the number (001-999).
///
/// - `const_new`: for const definitions (panics = compile error)
/// - `checked_new`: for runtime construction (returns `Result`, never panics)
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ErrorCode {
    namespace: &'static ErrorNamespace,
    code: u16,
    kind: ErrorKind,
}

impl ErrorCode {
    /// Create a new error code with compile-time validation.
    ///
    /// # Panics
    ///
    /// Panics if the code is outside 001-999 or the kind is not permitted for
    /// the namespace. In const contexts this is a compile error.
    #[inline]
    pub const fn const_new(namespace: &'static ErrorNamespace, code: u16, kind: ErrorKind) -> Self {
        assert!(code > 0 && code < 1000, "Error code must be 001-999");
        assert!(
            permits_kind(namespace, kind),
            "Error kind not permitted for this namespace"
        );

        Self {
            namespace,
            code,
            kind,
        }
    }

    /// Create a new error code with runtime validation.
    ///
    /// # Errors
    ///
    /// Returns the violation that would have been a compile error in `const_new`.
    #[inline]
    pub fn checked_new(
        namespace: &'static ErrorNamespace,
        code: u16,
        kind: ErrorKind,
    ) -> Result<Self, InternalErrorCodeViolation> {
        if code == 0 || code >= 1000 {
            return Err(InternalErrorCodeViolation::CodeOutOfRange { value: code });
        }

        if !permits_kind(namespace, kind) {
            return Err(InternalErrorCodeViolation::KindNotPermitted {
                namespace: namespace.as_str(),
                kind: kind.as_str(),
            });
        }

        Ok(Self {
            namespace,
            code,
            kind,
        })
    }

    /// Get the error kind this code classifies into.
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get namespace reference.
    #[inline]
    pub const fn namespace(&self) -> &'static ErrorNamespace {
        self.namespace
    }

    /// Get numeric code.
    #[inline]
    pub const fn code(&self) -> u16 {
        self.code
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E-{}-{:03}", self.namespace.as_str(), self.code)
    }
}

// ============================================================================
// Tests
// ============================================================================
