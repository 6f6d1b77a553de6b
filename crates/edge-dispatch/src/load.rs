//! In-flight local request counter.

use edge_router::LoadSnapshot;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;

/// Shared by every dispatch that targets a local backend. Updates are single
/// atomic operations; no lock is held across an invocation.
#[derive(Debug)]
pub struct LoadTracker {
    in_flight: AtomicUsize,
    capacity: usize,
}

impl LoadTracker {
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        if capacity == 0 {
            warn!("local capacity of 0 raised to 1");
        }
        Self { in_flight: AtomicUsize::new(0), capacity: capacity.max(1) }
    }

    /// Count one local request until the returned guard drops.
    pub fn acquire(&self) -> LoadGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        LoadGuard { tracker: self }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn snapshot(&self) -> LoadSnapshot {
        LoadSnapshot::new(self.in_flight(), self.capacity)
    }
}

/// Decrements on drop, including when the owning future is cancelled.
#[derive(Debug)]
pub struct LoadGuard<'a> {
    tracker: &'a LoadTracker,
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.tracker.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}
