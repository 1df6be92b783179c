//! Structured log entry for internal diagnostics.
//!
//! `InternalLog` borrows from a [`GameError`](crate::GameError) and cannot
//! outlive it. It is produced on demand by the classifier, written to the log
//! sink and dropped; the error's owned strings are zeroized when the error
//! itself drops.
//!
//! Sensitive sources (save-file paths, language pack paths) are written as
//! `[REDACTED]` unless the crate is built with the `trusted_debug` feature.

use crate::{ErrorCode, ErrorKind};
use std::borrow::Cow;
use std::fmt;
use zeroize::Zeroize;

/// Maximum length for any individual field in formatted output
const MAX_FIELD_OUTPUT_LEN: usize = 1024;

/// Truncation indicator appended to truncated strings
const TRUNCATION_INDICATOR: &str = "...[TRUNCATED]";

/// Written in place of sensitive sources in untrusted builds.
pub const REDACTED: &str = "[REDACTED]";

/// Metadata value wrapper with zeroization for owned data.
///
/// Borrowed values are assumed static and are not zeroized.
#[derive(Debug)]
pub struct ContextField {
    value: Cow<'static, str>,
}

impl ContextField {
    /// Borrow the value.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.value.as_ref()
    }
}

impl From<&'static str> for ContextField {
    fn from(value: &'static str) -> Self {
        Self {
            value: Cow::Borrowed(value),
        }
    }
}

impl From<String> for ContextField {
    fn from(value: String) -> Self {
        Self {
            value: Cow::Owned(value),
        }
    }
}

impl From<Cow<'static, str>> for ContextField {
    fn from(value: Cow<'static, str>) -> Self {
        Self { value }
    }
}

impl Zeroize for ContextField {
    fn zeroize(&mut self) {
        if let Cow::Owned(ref mut s) = self.value {
            s.zeroize();
        }
    }
}

impl Drop for ContextField {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Structured log entry with borrowed data from a `GameError`.
///
/// ```rust
/// # use saga_errors::{GameError, definitions};
/// let err = GameError::combat(definitions::CMB_TARGET_NOT_FOUND, "resolve_attack", "no goblin");
/// let mut line = String::new();
/// err.internal_log().write_to(&mut line).unwrap();
/// assert!(line.starts_with("[E-CMB-200]"));
/// ```
#[derive(Debug)]
pub struct InternalLog<'a> {
    /// Code of the failure.
    pub code: &'a ErrorCode,
    /// Classified kind (may differ from the code's for missing files).
    pub kind: ErrorKind,
    /// Operation that failed.
    pub operation: &'a str,
    /// Free-form details.
    pub details: &'a str,
    /// Non-sensitive source label, e.g. an io error kind.
    pub source_internal: Option<&'a str>,
    /// Sensitive source such as a file path.
    pub source_sensitive: Option<&'a str>,
    /// Key/value diagnostics.
    pub metadata: &'a [(&'static str, ContextField)],
}

impl<'a> InternalLog<'a> {
    /// Write the entry as a single `key='value'` line fragment.
    ///
    /// Every field is truncated to 1 KiB on a UTF-8 boundary.
    pub fn write_to(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(
            f,
            "[{}] kind={} operation='{}' details='{}'",
            self.code,
            self.kind,
            truncate_with_indicator(self.operation),
            truncate_with_indicator(self.details)
        )?;

        if let Some(internal) = self.source_internal {
            write!(f, " source='{}'", truncate_with_indicator(internal))?;
        }

        if let Some(sensitive) = self.source_sensitive {
            write!(f, " sensitive='{}'", sensitive_field(sensitive))?;
        }

        for (key, value) in self.metadata {
            write!(f, " {}='{}'", key, truncate_with_indicator(value.as_str()))?;
        }

        Ok(())
    }

    /// Error code of the failure.
    #[inline]
    pub const fn code(&self) -> &ErrorCode {
        self.code
    }

    /// Kind the code classifies to.
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Operation name given at construction.
    #[inline]
    pub const fn operation(&self) -> &str {
        self.operation
    }

    /// Internal description as given at construction.
    #[inline]
    pub const fn details(&self) -> &str {
        self.details
    }

    /// Underlying cause, if any (e.g. an io error kind).
    #[inline]
    pub const fn source_internal(&self) -> Option<&str> {
        self.source_internal
    }

    /// Sensitive source such as a save path. Written to logs only with `trusted_debug`.
    #[inline]
    pub const fn source_sensitive(&self) -> Option<&str> {
        self.source_sensitive
    }

    /// Attached key/value diagnostics.
    #[inline]
    pub const fn metadata(&self) -> &[(&'static str, ContextField)] {
        self.metadata
    }
}

#[cfg(feature = "trusted_debug")]
#[inline]
fn sensitive_field(value: &str) -> Cow<'_, str> {
    truncate_with_indicator(value)
}

#[cfg(not(feature = "trusted_debug"))]
#[inline]
fn sensitive_field(_value: &str) -> Cow<'_, str> {
    Cow::Borrowed(REDACTED)
}

/// Truncate a string to `MAX_FIELD_OUTPUT_LEN` bytes, marking the cut.
///
/// Returns a `Cow` to avoid allocation when no truncation is needed.
pub(crate) fn truncate_with_indicator(s: &str) -> Cow<'_, str> {
    if s.len() <= MAX_FIELD_OUTPUT_LEN {
        return Cow::Borrowed(s);
    }

    let max_content_len = MAX_FIELD_OUTPUT_LEN.saturating_sub(TRUNCATION_INDICATOR.len());

    let mut idx = max_content_len;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }

    if idx == 0 {
        return Cow::Borrowed(TRUNCATION_INDICATOR);
    }

    let mut result = String::with_capacity(idx + TRUNCATION_INDICATOR.len());
    result.push_str(&s[..idx]);
    result.push_str(TRUNCATION_INDICATOR);
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{definitions, GameError};
    use std::io;

    #[test]
    fn truncate_ascii() {
        let s = "a".repeat(MAX_FIELD_OUTPUT_LEN + 10);
        let truncated = truncate_with_indicator(&s);

        assert!(truncated.len() <= MAX_FIELD_OUTPUT_LEN);
        assert!(truncated.ends_with(TRUNCATION_INDICATOR));
    }

    #[test]
    fn no_truncate_when_under_limit() {
        let s = "short string";
        let truncated = truncate_with_indicator(s);

        assert!(matches!(truncated, Cow::Borrowed(_)));
        assert_eq!(truncated, s);
    }

    #[test]
    fn truncate_utf8_boundary() {
        let s = "й".repeat(MAX_FIELD_OUTPUT_LEN);
        let truncated = truncate_with_indicator(&s);

        assert!(truncated.len() <= MAX_FIELD_OUTPUT_LEN);
        assert!(truncated.ends_with(TRUNCATION_INDICATOR));
    }

    #[test]
    fn exactly_at_limit() {
        let s = "a".repeat(MAX_FIELD_OUTPUT_LEN);
        let truncated = truncate_with_indicator(&s);

        assert!(matches!(truncated, Cow::Borrowed(_)));
        assert_eq!(truncated.len(), MAX_FIELD_OUTPUT_LEN);
    }

    #[test]
    fn context_field_zeroizes_owned() {
        let mut field = ContextField::from(String::from("slot-3"));
        assert!(matches!(field.value, Cow::Owned(_)));

        field.zeroize();
        assert_eq!(field.as_str(), "");
    }

    #[test]
    fn context_field_doesnt_zeroize_borrowed() {
        let mut field = ContextField::from("static");
        field.zeroize();
        assert_eq!(field.as_str(), "static");
    }

    #[test]
    fn write_to_includes_code_kind_and_fields() {
        let err = GameError::equipment(
            definitions::EQP_SLOT_OCCUPIED,
            "equip_item",
            "Main hand already holds a sword",
        )
        .with_metadata("slot", "main_hand");

        let mut line = String::new();
        err.internal_log().write_to(&mut line).unwrap();

        assert_eq!(
            line,
            "[E-EQP-302] kind=StateError operation='equip_item' \
             details='Main hand already holds a sword' slot='main_hand'"
        );
    }

    #[cfg(not(feature = "trusted_debug"))]
    #[test]
    fn sensitive_source_is_redacted() {
        let err = GameError::from_io_path(
            definitions::SAV_READ_FAILED,
            "load_save",
            "/home/player/.saga/slot1.sav",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );

        let mut line = String::new();
        err.internal_log().write_to(&mut line).unwrap();

        assert!(line.contains("source='PermissionDenied'"));
        assert!(line.contains("sensitive='[REDACTED]'"));
        assert!(!line.contains("/home/player"));
    }

    #[cfg(feature = "trusted_debug")]
    #[test]
    fn sensitive_source_is_written_in_trusted_builds() {
        let err = GameError::from_io_path(
            definitions::SAV_READ_FAILED,
            "load_save",
            "/home/player/.saga/slot1.sav",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );

        let mut line = String::new();
        err.internal_log().write_to(&mut line).unwrap();

        assert!(line.contains("sensitive='/home/player/.saga/slot1.sav'"));
    }
}
