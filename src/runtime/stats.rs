use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time view of an executor's counters.
///
/// Counters are read one at a time, but a snapshot never shows more
/// executed tasks than submitted ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Tasks accepted into the mailbox.
    pub submitted: u64,
    /// Tasks that ran to completion or panicked.
    pub executed: u64,
    /// Pending tasks replaced by a newer submission.
    pub superseded: u64,
    /// Executed tasks that panicked.
    pub panicked: u64,
    /// Tasks submitted after shutdown.
    pub rejected: u64,
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    submitted: AtomicU64,
    executed: AtomicU64,
    superseded: AtomicU64,
    panicked: AtomicU64,
    rejected: AtomicU64,
}

impl Counters {
    pub(crate) fn record_submitted(&self, superseded: bool) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
        if superseded {
            self.superseded.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_executed(&self, panicked: bool) {
        if panicked {
            self.panicked.fetch_add(1, Ordering::Relaxed);
        }
        self.executed.fetch_add(1, Ordering::Release);
    }

    pub(crate) fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> Stats {
        // `executed` first: its acquire makes every submission counted
        // before those runs visible to the loads below.
        let executed = self.executed.load(Ordering::Acquire);
        Stats {
            submitted: self.submitted.load(Ordering::Relaxed),
            executed,
            superseded: self.superseded.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}
