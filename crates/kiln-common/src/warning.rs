//! Converter warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the CSS, selector, mapper and builder stages to report contained
//! failures (a bad selector, a value a mapper rejected) without aborting the
//! conversion.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Most distinct warnings remembered before the log starts over.
pub const MAX_REMEMBERED: usize = 1024;

/// Messages already printed, bounded by a capacity.
#[derive(Debug, Default)]
pub struct WarningLog {
    seen: HashSet<String>,
    capacity: usize,
}

impl WarningLog {
    /// An empty log remembering at most `capacity` messages.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            seen: HashSet::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record `key`. Returns `true` if it was not already remembered.
    /// A full log is emptied first, so old warnings may print again.
    pub fn record(&mut self, key: String) -> bool {
        if self.seen.contains(&key) {
            return false;
        }
        if self.seen.len() >= self.capacity {
            self.seen.clear();
        }
        self.seen.insert(key)
    }

    /// Number of remembered messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing is remembered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.seen.clear();
    }
}

/// Warnings printed during the current conversion (to deduplicate)
static WARNED: Mutex<Option<WarningLog>> = Mutex::new(None);

/// When set, warnings are still recorded but nothing is printed.
static QUIET: AtomicBool = AtomicBool::new(false);

/// Warn about a contained failure (prints once per unique message).
///
/// Returns `true` the first time a given `component`/`message` pair is seen.
///
/// # Example
/// ```
/// use kiln_common::warning::warn_once;
///
/// let _ = warn_once("Selector", "failed to parse selector 'a[href'");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let first_time = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(|| WarningLog::with_capacity(MAX_REMEMBERED))
        .record(key);

    if first_time && !QUIET.load(Ordering::Relaxed) {
        eprintln!("{}", format!("[kiln {component}] ⚠ {message}").yellow());
    }
    first_time
}

/// Silence (or re-enable) warning output. Deduplication still applies.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

/// Clear all recorded warnings. Each conversion starts with this, so a
/// later run prints its warnings again.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(log) = guard.as_mut() {
        log.clear();
    }
}
