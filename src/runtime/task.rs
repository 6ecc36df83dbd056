// A unit of work that runs once on the worker thread.
pub trait Task: Send + 'static {
    type Output: Send + 'static;
    fn run(self) -> Self::Output;
}

impl<F, O> Task for F
where
    F: FnOnce() -> O + Send + 'static,
    O: Send + 'static,
{
    type Output = O;

    fn run(self) -> Self::Output {
        self()
    }
}

/// Type-erased task as stored in the mailbox.
pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

pub(crate) fn into_job<T>(task: T) -> Job
where
    T: Task<Output = ()>,
{
    Box::new(move || task.run())
}
