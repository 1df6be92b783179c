//! Sanitization helpers and convenience macros for creating errors.
//!
//! # Rules
//!
//! 1. **Operation names MUST be string literals** so logs can be grepped
//! 2. **Format strings MUST be string literals**
//! 3. **Format arguments must be wrapped in `sanitized!()`** - raw keyboard
//!    input never reaches a log line unbounded or with control characters
//!
//! # Usage
//!
//! ```rust
//! # use saga_errors::{save_err, definitions, sanitized};
//! let slot = 3;
//! let err = save_err!(
//!     definitions::SAV_CORRUPTED,
//!     "load_save",
//!     "Checksum mismatch in slot {}",
//!     sanitized!(slot)
//! );
//! ```
//!
//! ```rust,compile_fail
//! # use saga_errors::{save_err, definitions};
//! let op = String::from("load_save");
//! // Operation must be a literal
//! let err = save_err!(definitions::SAV_CORRUPTED, op, "Failed");
//! ```
//!
//! ```rust,compile_fail
//! # use saga_errors::{save_err, definitions};
//! let typed = "oops";
//! // Args must be wrapped in sanitized!()
//! let err = save_err!(definitions::SAV_CORRUPTED, "op", "{}", typed);
//! ```

// ============================================================================
// Sanitization Utilities
// ============================================================================

/// Maximum length for sanitized strings in error messages.
pub const MAX_SANITIZED_LEN: usize = 256;

/// Placeholder for input with no printable content.
pub const INVALID_INPUT_MARKER: &str = "[INVALID_INPUT]";

const TRUNCATION_SUFFIX: &str = "...[TRUNCATED]";

/// Sanitize untrusted text to at most [`MAX_SANITIZED_LEN`] bytes.
///
/// See [`sanitize_bounded`].
#[inline]
pub fn sanitize(input: &str) -> String {
    sanitize_bounded(input, MAX_SANITIZED_LEN)
}

/// Where the sanitizer is inside an escape sequence.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Escape {
    None,
    /// Just saw ESC.
    Start,
    /// Inside `ESC [ params intermediates final`.
    Csi,
    /// After `ESC O`, expecting one final byte.
    Ss3,
}

#[inline]
fn is_csi_final(c: char) -> bool {
    ('\x40'..='\x7e').contains(&c)
}

/// Sanitize untrusted text for a single log line.
///
/// - Control characters become `?`; an escape sequence (CSI such as arrow
///   keys or colours, or SS3) collapses to one `?` and the text after it is kept
/// - Output is at most `max_len` bytes, cut on a UTF-8 boundary and marked
///   with `...[TRUNCATED]`
/// - Input without a single printable character becomes `[INVALID_INPUT]`
pub fn sanitize_bounded(input: &str, max_len: usize) -> String {
    let mut s = String::with_capacity(max_len.min(input.len()));
    let mut truncated = false;
    let mut saw_non_control = false;
    let mut escape = Escape::None;

    for c in input.chars() {
        match escape {
            Escape::None => {}
            Escape::Start => {
                escape = Escape::None;
                match c {
                    '[' => {
                        escape = Escape::Csi;
                        continue;
                    }
                    'O' => {
                        escape = Escape::Ss3;
                        continue;
                    }
                    _ => {}
                }
            }
            Escape::Csi => {
                if ('\x20'..='\x3f').contains(&c) {
                    continue;
                }
                escape = Escape::None;
                if is_csi_final(c) {
                    continue;
                }
            }
            Escape::Ss3 => {
                escape = Escape::None;
                if is_csi_final(c) {
                    continue;
                }
            }
        }

        let replacement = if c == '\u{1b}' {
            escape = Escape::Start;
            '?'
        } else if c.is_control() {
            '?'
        } else {
            saw_non_control = true;
            c
        };

        if s.len() + replacement.len_utf8() > max_len {
            truncated = true;
            break;
        }
        s.push(replacement);
    }

    if !saw_non_control {
        return String::from(INVALID_INPUT_MARKER);
    }

    if truncated {
        let mut new_len = max_len.saturating_sub(TRUNCATION_SUFFIX.len());
        while new_len > 0 && !s.is_char_boundary(new_len) {
            new_len -= 1;
        }
        s.truncate(new_len);
        if s.is_empty() {
            return String::from(INVALID_INPUT_MARKER);
        }
        s.push_str(TRUNCATION_SUFFIX);
    }

    s
}

/// Sanitize any `Display` value for inclusion in an error message.
///
/// ```rust
/// # use saga_errors::sanitized;
/// let long = "A".repeat(300);
/// let san = sanitized!(long);
/// assert!(san.len() <= 256);
/// assert!(san.ends_with("[TRUNCATED]"));
/// ```
#[macro_export]
macro_rules! sanitized {
    ($expr:expr) => {
        $crate::convenience::sanitize(&$expr.to_string())
    };
}

// ============================================================================
// Error Creation Macros
// ============================================================================

#[doc(hidden)]
#[macro_export]
macro_rules! create_game_error {
    ($ctor:ident, $code:expr, $op:literal, $details:literal) => {
        $crate::GameError::$ctor($code, $op, $details)
    };
    ($ctor:ident, $code:expr, $op:literal, $fmt:literal $(, sanitized!($arg:expr))+ $(,)?) => {
        $crate::GameError::$ctor($code, $op, format!($fmt $(, $crate::sanitized!($arg))+))
    };
}

/// Create a combat error.
///
/// ```rust
/// # use saga_errors::{combat_err, definitions, sanitized};
/// let target = "goblin#4";
/// let err = combat_err!(
///     definitions::CMB_TARGET_NOT_FOUND,
///     "resolve_attack",
///     "No target named {}",
///     sanitized!(target)
/// );
/// ```
#[macro_export]
macro_rules! combat_err {
    ($code:expr, $op:literal, $($rest:tt)+) => {
        $crate::create_game_error!(combat, $code, $op, $($rest)+)
    };
}

/// Create an equipment error.
#[macro_export]
macro_rules! equipment_err {
    ($code:expr, $op:literal, $($rest:tt)+) => {
        $crate::create_game_error!(equipment, $code, $op, $($rest)+)
    };
}

/// Create an event error.
#[macro_export]
macro_rules! event_err {
    ($code:expr, $op:literal, $($rest:tt)+) => {
        $crate::create_game_error!(event, $code, $op, $($rest)+)
    };
}

/// Create a save/load error.
#[macro_export]
macro_rules! save_err {
    ($code:expr, $op:literal, $($rest:tt)+) => {
        $crate::create_game_error!(save, $code, $op, $($rest)+)
    };
}

/// Create a language lookup error.
#[macro_export]
macro_rules! language_err {
    ($code:expr, $op:literal, $($rest:tt)+) => {
        $crate::create_game_error!(language, $code, $op, $($rest)+)
    };
}

/// Create a player input error.
#[macro_export]
macro_rules! input_err {
    ($code:expr, $op:literal, $($rest:tt)+) => {
        $crate::create_game_error!(input, $code, $op, $($rest)+)
    };
}

/// Create a core state error.
#[macro_export]
macro_rules! state_err {
    ($code:expr, $op:literal, $($rest:tt)+) => {
        $crate::create_game_error!(state, $code, $op, $($rest)+)
    };
}

// ============================================================================
// Error Code Definition Macros
// ============================================================================

/// Define a single error code constant.
///
/// ```rust
/// # use saga_errors::{define_error_code, namespaces};
/// define_error_code!(EVT_SHRINE_SEALED, &namespaces::EVT, 450, StateError);
/// ```
#[macro_export]
macro_rules! define_error_code {
    ($name:ident, $namespace:expr, $code:expr, $kind:ident) => {
        pub const $name: $crate::ErrorCode =
            $crate::ErrorCode::const_new($namespace, $code, $crate::ErrorKind::$kind);
    };
}

/// Define multiple error codes within the same namespace.
///
/// ```rust
/// # use saga_errors::{define_error_codes, namespaces};
/// define_error_codes! {
///     &namespaces::CMB => {
///         CMB_NO_MANA = (260, StateError),
///         CMB_NO_SPELL = (261, NotFound),
///     }
/// }
/// ```
#[macro_export]
macro_rules! define_error_codes {
    ($namespace:expr => { $( $name:ident = ($code:expr, $kind:ident) ),+ $(,)? }) => {
        $(
            $crate::define_error_code!($name, $namespace, $code, $kind);
        )+
    };
}

// ============================================================================
// Tests
// ============================================================================
