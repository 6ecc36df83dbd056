use crate::runtime::{CoalescingExecutor, Error, ExecutorConfig, Task};
use std::sync::OnceLock;

// Process-wide executor; never shut down.
static GLOBAL_EXECUTOR: OnceLock<CoalescingExecutor> = OnceLock::new();

pub fn init() -> Result<(), Error> {
    init_with_config(ExecutorConfig::default())
}

/// Creates the global executor with `config`.
///
/// Fails with [`Error::AlreadyInitialized`] if it already exists, including
/// when it was created lazily by an earlier [`submit`].
pub fn init_with_config(config: ExecutorConfig) -> Result<(), Error> {
    if GLOBAL_EXECUTOR.get().is_some() {
        return Err(Error::AlreadyInitialized);
    }

    let executor = CoalescingExecutor::with_config(config)?;
    // Losing a race drops our executor, which joins its idle worker.
    GLOBAL_EXECUTOR
        .set(executor)
        .map_err(|_| Error::AlreadyInitialized)
}

/// Returns the global executor, creating it with defaults on first use.
pub fn executor() -> Result<&'static CoalescingExecutor, Error> {
    if let Some(executor) = GLOBAL_EXECUTOR.get() {
        return Ok(executor);
    }

    let executor = CoalescingExecutor::new()?;
    // If another thread won the race, ours is dropped unused and its idle
    // worker joined.
    Ok(GLOBAL_EXECUTOR.get_or_init(|| executor))
}

pub fn submit<T>(task: T) -> Result<(), Error>
where
    T: Task<Output = ()>,
{
    executor()?.submit(task);
    Ok(())
}
