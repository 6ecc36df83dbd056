use crate::runtime::mailbox::Mailbox;
use crate::runtime::stats::Counters;
use crate::runtime::task::Job;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{error, info, trace};

/// State shared between the executor handle and its worker thread.
pub(crate) struct Shared {
    pub(crate) mailbox: Mailbox,
    pub(crate) counters: Counters,
}

impl Shared {
    pub(crate) fn new() -> Self {
        Self {
            mailbox: Mailbox::new(),
            counters: Counters::default(),
        }
    }
}

/// Body of the dedicated worker thread.
///
/// Drains the mailbox and runs each job to completion, parking whenever the
/// slot is empty. Exits once the mailbox is closed and drained.
pub(crate) fn run(shared: Arc<Shared>, name: String) {
    info!(name = %name, "Worker thread started");

    while let Some(job) = shared.mailbox.drain_or_park() {
        let panicked = run_guarded(job, &name);
        shared.counters.record_executed(panicked);
    }

    info!(name = %name, "Worker thread exiting");
}

/// Runs one job, containing any panic. Returns `true` if the job panicked.
fn run_guarded(job: Job, name: &str) -> bool {
    trace!(name = %name, "Running task");
    match panic::catch_unwind(AssertUnwindSafe(job)) {
        Ok(()) => false,
        Err(payload) => {
            error!(
                name = %name,
                panic = %panic_message(payload.as_ref()),
                "Task panicked"
            );
            true
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
