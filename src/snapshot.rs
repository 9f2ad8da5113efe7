//! Published snapshot store and single-flight collection gate.
//!
//! One writer (the scheduler) swaps in a fully rendered document; any number
//! of scrape handlers read it concurrently. Readers always see a complete
//! document — either the previous cycle's or the new one, never a hybrid.
//!
//! The collection gate guarantees at most one pipeline run in flight: a
//! trigger that finds the gate held is a no-op, not a queue entry.

use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared store for the current exposition document.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    snapshot: RwLock<String>,
    collecting: AtomicBool,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the most recently published document, or the empty initial
    /// value before the first cycle completes.
    pub fn read(&self) -> String {
        self.snapshot.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Publishes a complete document, replacing the previous one.
    /// The write lock is held only for the swap.
    pub fn publish(&self, text: String) {
        *self.snapshot.write().unwrap_or_else(|e| e.into_inner()) = text;
    }

    /// Attempts to claim the collection gate.
    ///
    /// Returns `None` when a collection is already in flight. The returned
    /// guard releases the gate on drop, so a panicking cycle cannot wedge the
    /// scheduler permanently.
    pub fn try_begin_collection(&self) -> Option<CollectionGuard<'_>> {
        self.collecting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(CollectionGuard { store: self })
    }
}

/// RAII guard marking a collection cycle in flight.
#[derive(Debug)]
pub struct CollectionGuard<'a> {
    store: &'a SnapshotStore,
}

impl Drop for CollectionGuard<'_> {
    fn drop(&mut self) {
        self.store.collecting.store(false, Ordering::Release);
    }
}
