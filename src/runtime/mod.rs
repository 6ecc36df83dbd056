pub mod config;
pub mod error;
pub mod executor;
pub mod global;
pub mod handle;
pub mod stats;
pub mod task;

mod mailbox;
mod worker;

pub use config::ExecutorConfig;
pub use error::Error;
pub use executor::CoalescingExecutor;
pub use global::{init, init_with_config, submit};
pub use handle::TaskHandle;
pub use stats::Stats;
pub use task::Task;
