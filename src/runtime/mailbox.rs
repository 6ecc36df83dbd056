use crate::runtime::stats::Counters;
use crate::runtime::task::Job;

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Outcome of storing a job in the mailbox.
pub(crate) enum Put {
    /// The job was stored. Carries the job it replaced, if any.
    Stored(Option<Job>),
    /// The mailbox is closed; the job is handed back untouched.
    Closed(Job),
}

struct Slot {
    pending: Option<Job>,
    closed: bool,
}

/// Single-slot mailbox shared by producers and the worker.
///
/// Holds at most one pending job. Every `put` overwrites the previous
/// contents. The worker drains with [`Mailbox::drain_or_park`], which
/// re-checks the slot under the lock before every wait, so a `put` racing
/// with the worker's "empty, go to sleep" transition is always observed.
pub(crate) struct Mailbox {
    slot: Mutex<Slot>,
    ready: Condvar,
}

impl Mailbox {
    pub(crate) fn new() -> Self {
        Mailbox {
            slot: Mutex::new(Slot {
                pending: None,
                closed: false,
            }),
            ready: Condvar::new(),
        }
    }

    // Jobs never run under this lock, so a poisoned guard still holds a
    // consistent slot.
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `job`, replacing any pending job, and wakes the worker.
    ///
    /// The outcome is recorded in `counters` before the lock is released, so
    /// the worker can never count a job as executed ahead of its submission.
    /// The replaced job is returned so the caller drops it outside the lock.
    pub(crate) fn put(&self, job: Job, counters: &Counters) -> Put {
        let previous = {
            let mut slot = self.lock();
            if slot.closed {
                counters.record_rejected();
                return Put::Closed(job);
            }
            let previous = slot.pending.replace(job);
            counters.record_submitted(previous.is_some());
            previous
        };
        self.ready.notify_one();
        Put::Stored(previous)
    }

    /// Takes the pending job, parking until one arrives.
    ///
    /// Returns `None` only once the mailbox is closed and empty.
    pub(crate) fn drain_or_park(&self) -> Option<Job> {
        let mut slot = self.lock();
        loop {
            if let Some(job) = slot.pending.take() {
                return Some(job);
            }
            if slot.closed {
                return None;
            }
            slot = self
                .ready
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Stops accepting jobs. A job already pending is still drained.
    ///
    /// Returns `false` if the mailbox was already closed.
    pub(crate) fn close(&self) -> bool {
        let was_open = {
            let mut slot = self.lock();
            !std::mem::replace(&mut slot.closed, true)
        };
        self.ready.notify_all();
        was_open
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub(crate) fn has_pending(&self) -> bool {
        self.lock().pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    fn counting_job(counter: &Arc<AtomicUsize>, value: usize) -> Job {
        let counter = counter.clone();
        Box::new(move || {
            counter.store(value, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_put_replaces_pending() {
        let mailbox = Mailbox::new();
        let counters = Counters::default();
        let counter = Arc::new(AtomicUsize::new(0));

        assert!(matches!(
            mailbox.put(counting_job(&counter, 1), &counters),
            Put::Stored(None)
        ));
        assert!(matches!(
            mailbox.put(counting_job(&counter, 2), &counters),
            Put::Stored(Some(_))
        ));

        let job = mailbox.drain_or_park().unwrap();
        job();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert!(!mailbox.has_pending());

        let stats = counters.snapshot();
        assert_eq!(stats.submitted, 2);
        assert_eq!(stats.superseded, 1);
    }

    #[test]
    fn test_closed_mailbox_rejects_put() {
        let mailbox = Mailbox::new();
        assert!(mailbox.close());
        assert!(!mailbox.close());
        assert!(mailbox.is_closed());

        let counters = Counters::default();
        let counter = Arc::new(AtomicUsize::new(0));
        assert!(matches!(
            mailbox.put(counting_job(&counter, 1), &counters),
            Put::Closed(_)
        ));
        assert!(mailbox.drain_or_park().is_none());
        assert_eq!(counters.snapshot().rejected, 1);
        assert_eq!(counters.snapshot().submitted, 0);
    }

    #[test]
    fn test_close_keeps_pending_job() {
        let mailbox = Mailbox::new();
        let counter = Arc::new(AtomicUsize::new(0));
        mailbox.put(counting_job(&counter, 7), &Counters::default());
        mailbox.close();

        let job = mailbox.drain_or_park().unwrap();
        job();
        assert_eq!(counter.load(Ordering::SeqCst), 7);
        assert!(mailbox.drain_or_park().is_none());
    }

    #[test]
    fn test_parked_drain_wakes_on_put() {
        let mailbox = Arc::new(Mailbox::new());
        let counter = Arc::new(AtomicUsize::new(0));

        let drainer = {
            let mailbox = mailbox.clone();
            thread::spawn(move || mailbox.drain_or_park().map(|job| job()).is_some())
        };

        thread::sleep(Duration::from_millis(20));
        mailbox.put(counting_job(&counter, 3), &Counters::default());

        assert!(drainer.join().unwrap());
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_parked_drain_wakes_on_close() {
        let mailbox = Arc::new(Mailbox::new());

        let drainer = {
            let mailbox = mailbox.clone();
            thread::spawn(move || mailbox.drain_or_park().is_none())
        };

        thread::sleep(Duration::from_millis(20));
        mailbox.close();

        assert!(drainer.join().unwrap());
    }
}
