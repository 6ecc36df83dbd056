//! Single-slot work-coalescing executor.
//!
//! [`CoalescingExecutor`] runs tasks one at a time on a dedicated worker
//! thread and keeps at most one task waiting. Submitting while a task is
//! waiting replaces it, so the worker always moves on to the newest work.

pub mod runtime;

pub use runtime::{CoalescingExecutor, Error, ExecutorConfig, Stats, Task, TaskHandle};
