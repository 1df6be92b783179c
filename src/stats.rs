//! Error statistics for diagnostics and the end-of-session summary.

use crate::ErrorKind;
use std::collections::BTreeMap;
use std::fmt;

/// Counts of classified errors since the handler was created.
///
/// Kinds appear in `error_types` only once they have occurred. Callers only
/// ever see a snapshot; the live counters belong to the handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorStatistics {
    total_errors: u64,
    error_types: BTreeMap<ErrorKind, u64>,
}

impl ErrorStatistics {
    /// Empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one classified error. Total and per-kind move together.
    pub(crate) fn record(&mut self, kind: ErrorKind) {
        self.total_errors = self.total_errors.saturating_add(1);
        let count = self.error_types.entry(kind).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Total errors classified.
    #[inline]
    pub fn total_errors(&self) -> u64 {
        self.total_errors
    }

    /// Per-kind counts, only for kinds that occurred.
    #[inline]
    pub fn error_types(&self) -> &BTreeMap<ErrorKind, u64> {
        &self.error_types
    }

    /// Occurrences of `kind` (zero if never seen).
    #[inline]
    pub fn count(&self, kind: ErrorKind) -> u64 {
        self.error_types.get(&kind).copied().unwrap_or(0)
    }

    /// Kinds seen so far, in taxonomy order.
    pub fn kinds(&self) -> impl Iterator<Item = ErrorKind> + '_ {
        self.error_types.keys().copied()
    }

    /// Whether nothing has been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total_errors == 0
    }
}

impl fmt::Display for ErrorStatistics {
    /// One-line summary: `3 errors (NotFound: 1, InvalidInput: 2)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("no errors");
        }

        let noun = if self.total_errors == 1 { "error" } else { "errors" };
        write!(f, "{} {} (", self.total_errors, noun)?;
        for (i, (kind, count)) in self.error_types.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", kind, count)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_moves_total_and_kind_together() {
        let mut stats = ErrorStatistics::new();
        stats.record(ErrorKind::NotFound);
        stats.record(ErrorKind::InvalidInput);
        stats.record(ErrorKind::InvalidInput);

        assert_eq!(stats.total_errors(), 3);
        assert_eq!(stats.count(ErrorKind::NotFound), 1);
        assert_eq!(stats.count(ErrorKind::InvalidInput), 2);
        assert_eq!(stats.error_types().values().sum::<u64>(), stats.total_errors());
    }

    #[test]
    fn unseen_kinds_are_absent() {
        let mut stats = ErrorStatistics::new();
        stats.record(ErrorKind::StateError);

        assert!(!stats.error_types().contains_key(&ErrorKind::NotFound));
        assert_eq!(stats.count(ErrorKind::NotFound), 0);
        assert_eq!(stats.kinds().collect::<Vec<_>>(), [ErrorKind::StateError]);
    }

    #[test]
    fn summary_lists_kinds_in_taxonomy_order() {
        let mut stats = ErrorStatistics::new();
        stats.record(ErrorKind::Unknown);
        stats.record(ErrorKind::NotFound);
        stats.record(ErrorKind::Unknown);

        assert_eq!(stats.to_string(), "3 errors (NotFound: 1, Unknown: 2)");
    }

    #[test]
    fn summary_for_empty_and_single() {
        let mut stats = ErrorStatistics::new();
        assert_eq!(stats.to_string(), "no errors");

        stats.record(ErrorKind::IOFailure);
        assert_eq!(stats.to_string(), "1 error (IOFailure: 1)");
    }

    #[test]
    fn snapshot_is_independent() {
        let mut live = ErrorStatistics::new();
        live.record(ErrorKind::NotFound);
        let snapshot = live.clone();
        live.record(ErrorKind::NotFound);

        assert_eq!(snapshot.total_errors(), 1);
        assert_eq!(live.total_errors(), 2);
    }
}
