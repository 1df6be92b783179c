//! Checks for raw keyboard input.
//!
//! Validators are pure: they never log, never touch statistics and never
//! panic. A caller that wants rejected input counted converts the
//! [`ValidationError`] into a [`GameError`] and hands it to the handler.

use crate::codes::ErrorCode;
use crate::{definitions, GameError};
use std::error::Error;
use std::fmt;

/// Why a piece of player input was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Nothing but whitespace was entered.
    Empty,
    /// The text is not a base-10 integer (or does not fit in an `i64`).
    NotANumber,
    /// A number was entered but it lies outside `[min, max]`.
    OutOfRange {
        /// The parsed value.
        value: i64,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
    /// The caller asked for a number in an interval that contains none.
    EmptyRange {
        /// Requested lower bound.
        min: i64,
        /// Requested upper bound.
        max: i64,
    },
    /// The text matches none of the offered options.
    UnknownOption,
}

impl ValidationError {
    /// Input error code for this rejection.
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Empty => definitions::INP_EMPTY,
            Self::NotANumber => definitions::INP_NOT_A_NUMBER,
            Self::OutOfRange { .. } => definitions::INP_OUT_OF_RANGE,
            Self::EmptyRange { .. } => definitions::INP_EMPTY_RANGE,
            Self::UnknownOption => definitions::INP_UNKNOWN_OPTION,
        }
    }
}

impl fmt::Display for ValidationError {
    /// Re-prompt text, safe to print straight to the player.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Please enter a value."),
            Self::NotANumber => f.write_str("Please enter a whole number."),
            Self::OutOfRange { min, max, .. } => {
                write!(f, "Please enter a number between {} and {}.", min, max)
            }
            Self::EmptyRange { .. } => f.write_str("There is nothing to choose from right now."),
            Self::UnknownOption => f.write_str("That is not one of the options."),
        }
    }
}

impl Error for ValidationError {}

impl From<ValidationError> for GameError {
    fn from(err: ValidationError) -> Self {
        let details = match err {
            ValidationError::OutOfRange { value, min, max } => {
                format!("value {} outside [{}, {}]", value, min, max)
            }
            ValidationError::EmptyRange { min, max } => {
                format!("requested interval [{}, {}] is empty", min, max)
            }
            other => other.to_string(),
        };
        GameError::input(err.code(), "validate_input", details)
    }
}

/// Parse `text` as an integer in the inclusive interval `[min, max]`.
///
/// Surrounding whitespace is ignored. Blank input is [`ValidationError::Empty`],
/// never zero.
///
/// ```rust
/// # use saga_errors::{validate_numeric_input, ValidationError};
/// assert_eq!(validate_numeric_input("7", 1, 10), Ok(7));
/// assert_eq!(
///     validate_numeric_input("15", 1, 10),
///     Err(ValidationError::OutOfRange { value: 15, min: 1, max: 10 })
/// );
/// assert_eq!(validate_numeric_input("abc", 1, 10), Err(ValidationError::NotANumber));
/// ```
pub fn validate_numeric_input(text: &str, min: i64, max: i64) -> Result<i64, ValidationError> {
    if min > max {
        return Err(ValidationError::EmptyRange { min, max });
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }

    let value = trimmed
        .parse::<i64>()
        .map_err(|_| ValidationError::NotANumber)?;

    if value < min || value > max {
        return Err(ValidationError::OutOfRange { value, min, max });
    }

    Ok(value)
}

/// Whether `text` is exactly one of `valid_options`, or empty when `allow_empty`.
///
/// Matching is exact: no trimming, no case folding.
pub fn validate_input<S: AsRef<str>>(text: &str, valid_options: &[S], allow_empty: bool) -> bool {
    validate_option(text, valid_options, allow_empty).is_ok()
}

/// Typed form of [`validate_input`].
///
/// Returns the index of the matched option, or `None` for an empty string
/// accepted through `allow_empty`. An empty string that is itself one of the
/// options matches that option.
pub fn validate_option<S: AsRef<str>>(
    text: &str,
    valid_options: &[S],
    allow_empty: bool,
) -> Result<Option<usize>, ValidationError> {
    if let Some(index) = valid_options.iter().position(|option| option.as_ref() == text) {
        return Ok(Some(index));
    }

    match (text.is_empty(), allow_empty) {
        (true, true) => Ok(None),
        (true, false) => Err(ValidationError::Empty),
        (false, _) => Err(ValidationError::UnknownOption),
    }
}
