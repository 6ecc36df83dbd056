use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::runtime::error::Error;
use tokio::sync::oneshot;
use uuid::Uuid;

/// Completion handle for a task submitted with
/// [`CoalescingExecutor::submit_with_handle`](crate::runtime::CoalescingExecutor::submit_with_handle).
///
/// Resolves to the task's output once it has run. If a newer submission
/// replaced the task, or the executor was shut down before accepting it,
/// the handle resolves to [`Error::Discarded`] instead.
///
/// Dropping the handle has no effect on the task.
pub struct TaskHandle<T> {
    id: Uuid,
    receiver: oneshot::Receiver<Result<T, Error>>,
}

// Manual Debug implementation - works regardless of whether T implements Debug
impl<T> fmt::Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.id)
            .field("result_type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> TaskHandle<T> {
    pub(crate) fn new(id: Uuid, receiver: oneshot::Receiver<Result<T, Error>>) -> Self {
        Self { id, receiver }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Blocks the current thread until the task has run or been discarded.
    ///
    /// Must not be called from the executor's own worker thread, since the
    /// task could never run while the worker is blocked here.
    pub fn wait(self) -> Result<T, Error> {
        futures::executor::block_on(self)
    }
}

impl<T> Future for TaskHandle<T> {
    type Output = Result<T, Error>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|result| match result {
                Ok(task_result) => task_result,
                Err(e) => Err(e.into()),
            })
    }
}
