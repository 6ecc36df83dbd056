use crate::runtime::config::ExecutorConfig;
use crate::runtime::error::Error;
use crate::runtime::handle::TaskHandle;
use crate::runtime::mailbox::Put;
use crate::runtime::stats::Stats;
use crate::runtime::task::{Task, into_job};
use crate::runtime::worker::{self, Shared, panic_message};

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle, ThreadId};
use tokio::sync::oneshot;
use tracing::{debug, warn};
use uuid::Uuid;

/// Runs submitted tasks one at a time on a dedicated worker thread, keeping
/// only the most recent submission that has not started yet.
///
/// While the worker is busy, each [`submit`](Self::submit) replaces the
/// pending task; replaced tasks are dropped without running. This keeps a
/// producer that outpaces its consumer (a camera feeding a preview filter,
/// say) from ever building a backlog: when the worker frees up it runs the
/// newest task and skips everything in between.
///
/// # Example
///
/// ```
/// use coalesce::runtime::CoalescingExecutor;
///
/// let executor = CoalescingExecutor::new()?;
/// let handle = executor.submit_with_handle(|| 6 * 7);
/// assert_eq!(handle.wait()?, 42);
/// executor.shutdown()?;
/// # Ok::<(), coalesce::runtime::Error>(())
/// ```
pub struct CoalescingExecutor {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
    worker_id: ThreadId,
    thread_name: String,
}

impl fmt::Debug for CoalescingExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoalescingExecutor")
            .field("thread_name", &self.thread_name)
            .field("stats", &self.stats())
            .finish()
    }
}

impl CoalescingExecutor {
    /// Creates an executor with the default config and starts its worker.
    pub fn new() -> Result<Self, Error> {
        Self::with_config(ExecutorConfig::default())
    }

    pub fn with_config(config: ExecutorConfig) -> Result<Self, Error> {
        config.validate()?;

        let shared = Arc::new(Shared::new());
        let mut builder = thread::Builder::new().name(config.thread_name.clone());
        if let Some(bytes) = config.stack_size {
            builder = builder.stack_size(bytes);
        }

        let worker_shared = Arc::clone(&shared);
        let worker_name = config.thread_name.clone();
        let handle = builder.spawn(move || worker::run(worker_shared, worker_name))?;

        Ok(Self {
            shared,
            worker_id: handle.thread().id(),
            worker: Mutex::new(Some(handle)),
            thread_name: config.thread_name,
        })
    }

    /// Stores `task` as the next task to run, replacing any task still
    /// waiting, and wakes the worker.
    ///
    /// Never waits for the worker. After [`shutdown`](Self::shutdown) the
    /// task is dropped; use [`try_submit`](Self::try_submit) to detect that.
    pub fn submit<T>(&self, task: T)
    where
        T: Task<Output = ()>,
    {
        let _ = self.try_submit(task);
    }

    /// Like [`submit`](Self::submit), but reports [`Error::ShutDown`] when
    /// the executor no longer accepts work.
    pub fn try_submit<T>(&self, task: T) -> Result<(), Error>
    where
        T: Task<Output = ()>,
    {
        match self
            .shared
            .mailbox
            .put(into_job(task), &self.shared.counters)
        {
            // Dropped here, outside the mailbox lock.
            Put::Stored(replaced) => {
                drop(replaced);
                Ok(())
            }
            Put::Closed(rejected) => {
                drop(rejected);
                Err(Error::ShutDown)
            }
        }
    }

    /// Submits `task` and returns a handle resolving to its output.
    ///
    /// The handle yields [`Error::Discarded`] if the task is replaced before
    /// it runs, and [`Error::Panicked`] if it panics.
    pub fn submit_with_handle<T>(&self, task: T) -> TaskHandle<T::Output>
    where
        T: Task,
    {
        let (sender, receiver) = oneshot::channel();

        self.submit(move || match panic::catch_unwind(AssertUnwindSafe(|| task.run())) {
            Ok(output) => {
                let _ = sender.send(Ok(output));
            }
            Err(payload) => {
                let _ = sender.send(Err(Error::Panicked(panic_message(payload.as_ref()))));
                // Let the worker see and account for the panic too.
                panic::resume_unwind(payload);
            }
        });

        TaskHandle::new(Uuid::new_v4(), receiver)
    }

    /// Stops accepting work and waits for the worker to exit.
    ///
    /// The running task finishes and the pending task, if any, still runs
    /// before the worker exits. Concurrent and repeated calls all return
    /// only once the worker has exited.
    pub fn shutdown(&self) -> Result<(), Error> {
        if self.shared.mailbox.close() {
            debug!(name = %self.thread_name, "Shutdown requested");
        }

        if thread::current().id() == self.worker_id {
            return Err(Error::ShutdownFromWorker);
        }

        // Held across the join so racing callers wait for the same exit.
        let mut worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        match worker.take() {
            Some(handle) => {
                handle.join().map_err(|_| Error::WorkerPanicked)?;
                debug!(name = %self.thread_name, "Worker joined");
                Ok(())
            }
            None => Ok(()),
        }
    }

    pub fn stats(&self) -> Stats {
        self.shared.counters.snapshot()
    }

    /// Whether a task is waiting for the worker.
    pub fn has_pending(&self) -> bool {
        self.shared.mailbox.has_pending()
    }

    /// Whether the executor still accepts work.
    pub fn is_running(&self) -> bool {
        !self.shared.mailbox.is_closed()
    }

    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }
}

impl Drop for CoalescingExecutor {
    fn drop(&mut self) {
        match self.shutdown() {
            Ok(()) => {}
            // Dropped by one of its own tasks: the worker exits on its own
            // once that task returns.
            Err(Error::ShutdownFromWorker) => {}
            Err(e) => warn!(name = %self.thread_name, error = %e, "Executor shutdown failed"),
        }
    }
}
