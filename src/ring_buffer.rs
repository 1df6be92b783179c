//! Bounded history of recently classified failures.
//!
//! The handler keeps the last N records so a debug overlay or a bug report
//! can show "what went wrong recently" without re-reading the log file.
//! Memory stays fixed: the buffer is allocated once and the oldest entry is
//! evicted when it is full. No single entry may exceed
//! [`MAX_ENTRY_BYTES`] of text.
//!
//! ```rust
//! use saga_errors::ring_buffer::{ErrorEntry, ErrorHistory};
//! use saga_errors::{definitions, ErrorKind};
//!
//! let history = ErrorHistory::new(2);
//! for slot in 1..=3 {
//!     history.push(ErrorEntry::new(
//!         chrono::Local::now(),
//!         &definitions::SAV_FILE_MISSING,
//!         ErrorKind::NotFound,
//!         "load save",
//!         &format!("slot {} missing", slot),
//!     ));
//! }
//!
//! let recent = history.recent(10);
//! assert_eq!(recent.len(), 2);
//! assert_eq!(&*recent[0].description, "slot 3 missing");
//! assert_eq!(history.eviction_count(), 1);
//! ```

use crate::codes::{ErrorCode, ErrorKind};
use chrono::{DateTime, Local};
use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Text budget for one entry (context + description).
pub const MAX_ENTRY_BYTES: usize = 1024;

/// Capacity used when the handler config does not say otherwise.
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

const MAX_CONTEXT_BYTES: usize = 128;
const TRUNCATION_MARK: &str = "...[TRUNC]";

/// One remembered failure.
///
/// Strings are `Arc<str>` so handing copies to callers costs a refcount bump.
#[derive(Clone, Debug)]
pub struct ErrorEntry {
    /// When the failure was classified.
    pub timestamp: DateTime<Local>,
    /// Rendered code, e.g. `E-SAV-500`.
    pub code: Arc<str>,
    /// Classified kind.
    pub kind: ErrorKind,
    /// Caller-supplied context label.
    pub context: Arc<str>,
    /// Internal description (sensitive sources already redacted).
    pub description: Arc<str>,
}

impl ErrorEntry {
    /// Build an entry, truncating text to the per-entry budget.
    pub fn new(
        timestamp: DateTime<Local>,
        code: &ErrorCode,
        kind: ErrorKind,
        context: &str,
        description: &str,
    ) -> Self {
        let context = truncate_to_bytes(context, MAX_CONTEXT_BYTES);
        let description = truncate_to_bytes(description, MAX_ENTRY_BYTES - context.len());

        Self {
            timestamp,
            code: Arc::from(code.to_string()),
            kind,
            context: Arc::from(context.as_ref()),
            description: Arc::from(description.as_ref()),
        }
    }

    /// Bytes of text held by the entry.
    #[inline]
    pub fn text_len(&self) -> usize {
        self.context.len() + self.description.len()
    }
}

/// Fixed-size ring, allocated once.
struct Ring {
    slots: Box<[Option<ErrorEntry>]>,
    tail: usize,
    head: usize,
    len: usize,
}

impl Ring {
    fn new(capacity: usize) -> Self {
        Self {
            slots: std::iter::repeat_with(|| None).take(capacity).collect(),
            tail: 0,
            head: 0,
            len: 0,
        }
    }

    fn push(&mut self, entry: ErrorEntry) -> Option<ErrorEntry> {
        let evicted = self.slots[self.tail].replace(entry);
        self.tail = (self.tail + 1) % self.slots.len();

        if self.len < self.slots.len() {
            self.len += 1;
        } else {
            self.head = (self.head + 1) % self.slots.len();
        }

        evicted
    }

    /// Oldest to newest.
    fn iter(&self) -> impl DoubleEndedIterator<Item = &ErrorEntry> {
        let cap = self.slots.len();
        (0..self.len).filter_map(move |i| self.slots[(self.head + i) % cap].as_ref())
    }

    fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }
}

/// Thread-safe bounded FIFO of [`ErrorEntry`] values.
pub struct ErrorHistory {
    ring: RwLock<Ring>,
    capacity: usize,
    evictions: AtomicU64,
}

impl ErrorHistory {
    /// History holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            ring: RwLock::new(Ring::new(capacity)),
            capacity,
            evictions: AtomicU64::new(0),
        }
    }

    #[inline]
    fn read_ring(&self) -> RwLockReadGuard<'_, Ring> {
        match self.ring.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[inline]
    fn write_ring(&self) -> RwLockWriteGuard<'_, Ring> {
        match self.ring.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Append an entry, evicting the oldest when full.
    pub fn push(&self, entry: ErrorEntry) {
        if self.write_ring().push(entry).is_some() {
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Up to `n` entries, newest first.
    pub fn recent(&self, n: usize) -> Vec<ErrorEntry> {
        self.read_ring().iter().rev().take(n).cloned().collect()
    }

    /// Entries of one kind, newest first.
    pub fn of_kind(&self, kind: ErrorKind) -> Vec<ErrorEntry> {
        self.read_ring()
            .iter()
            .rev()
            .filter(|entry| entry.kind == kind)
            .cloned()
            .collect()
    }

    /// Number of entries currently held.
    #[inline]
    pub fn len(&self) -> usize {
        self.read_ring().len
    }

    /// Whether the history holds nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries dropped to make room since creation.
    #[inline]
    pub fn eviction_count(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    /// Forget every entry. The eviction count is kept.
    pub fn clear(&self) {
        self.write_ring().clear();
    }
}

impl Default for ErrorHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl std::fmt::Debug for ErrorHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorHistory")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("evictions", &self.eviction_count())
            .finish()
    }
}

/// Cut `s` to at most `max_bytes` on a char boundary, marking the cut.
fn truncate_to_bytes(s: &str, max_bytes: usize) -> Cow<'_, str> {
    if s.len() <= max_bytes {
        return Cow::Borrowed(s);
    }
    if max_bytes <= TRUNCATION_MARK.len() {
        return Cow::Borrowed(&TRUNCATION_MARK[..max_bytes]);
    }

    let mut idx = max_bytes - TRUNCATION_MARK.len();
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }

    let mut out = String::with_capacity(idx + TRUNCATION_MARK.len());
    out.push_str(&s[..idx]);
    out.push_str(TRUNCATION_MARK);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions;

    fn entry(description: &str) -> ErrorEntry {
        ErrorEntry::new(
            Local::now(),
            &definitions::CMB_TARGET_NOT_FOUND,
            ErrorKind::NotFound,
            "attack",
            description,
        )
    }

    #[test]
    fn evicts_oldest_first() {
        let history = ErrorHistory::new(3);
        for i in 0..5 {
            history.push(entry(&format!("goblin {}", i)));
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.eviction_count(), 2);

        let recent = history.recent(10);
        assert_eq!(&*recent[0].description, "goblin 4");
        assert_eq!(&*recent[2].description, "goblin 2");
    }

    #[test]
    fn recent_respects_n() {
        let history = ErrorHistory::new(8);
        for i in 0..5 {
            history.push(entry(&i.to_string()));
        }
        let recent = history.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(&*recent[0].description, "4");
        assert!(history.recent(0).is_empty());
    }

    #[test]
    fn zero_capacity_becomes_one() {
        let history = ErrorHistory::new(0);
        assert_eq!(history.capacity(), 1);
        history.push(entry("a"));
        history.push(entry("b"));
        assert_eq!(history.len(), 1);
        assert_eq!(&*history.recent(1)[0].description, "b");
    }

    #[test]
    fn entry_text_is_capped() {
        let e = entry(&"A".repeat(10_000));
        assert!(e.text_len() <= MAX_ENTRY_BYTES);
        assert!(e.description.ends_with(TRUNCATION_MARK));
        assert_eq!(&*e.code, "E-CMB-200");
    }

    #[test]
    fn long_context_is_capped_separately() {
        let e = ErrorEntry::new(
            Local::now(),
            &definitions::SAV_CORRUPTED,
            ErrorKind::StateError,
            &"c".repeat(500),
            &"d".repeat(5000),
        );
        assert!(e.context.len() <= MAX_CONTEXT_BYTES);
        assert!(e.text_len() <= MAX_ENTRY_BYTES);
    }

    #[test]
    fn truncate_respects_utf8() {
        let runes = "ᚠ".repeat(100);
        let cut = truncate_to_bytes(&runes, 50);
        assert!(cut.len() <= 50);
        assert!(std::str::from_utf8(cut.as_bytes()).is_ok());
    }

    #[test]
    fn truncate_borrows_when_short() {
        assert!(matches!(truncate_to_bytes("short", 100), Cow::Borrowed("short")));
    }

    #[test]
    fn of_kind_filters() {
        let history = ErrorHistory::new(8);
        history.push(entry("a"));
        history.push(ErrorEntry::new(
            Local::now(),
            &definitions::INP_NOT_A_NUMBER,
            ErrorKind::InvalidInput,
            "menu",
            "abc",
        ));
        assert_eq!(history.of_kind(ErrorKind::InvalidInput).len(), 1);
        assert_eq!(history.of_kind(ErrorKind::NotFound).len(), 1);
        assert!(history.of_kind(ErrorKind::Unknown).is_empty());
    }

    #[test]
    fn clones_share_text() {
        let history = ErrorHistory::new(4);
        history.push(entry("shared"));
        let a = history.recent(1).remove(0);
        let b = history.recent(1).remove(0);
        assert!(Arc::ptr_eq(&a.description, &b.description));
    }

    #[test]
    fn clear_keeps_eviction_count() {
        let history = ErrorHistory::new(1);
        history.push(entry("a"));
        history.push(entry("b"));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.eviction_count(), 1);
    }

    #[test]
    fn concurrent_pushes_stay_bounded() {
        use std::thread;

        let history = Arc::new(ErrorHistory::new(32));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let history = Arc::clone(&history);
                thread::spawn(move || {
                    for i in 0..50 {
                        history.push(entry(&format!("{}-{}", t, i)));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("thread panicked");
        }

        assert_eq!(history.len(), 32);
        assert_eq!(history.eviction_count(), 200 - 32);
    }
}
