use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("executor is shut down")]
    ShutDown,

    #[error("shutdown called from the worker thread")]
    ShutdownFromWorker,

    #[error("worker thread panicked")]
    WorkerPanicked,

    #[error("task discarded before it ran")]
    Discarded,

    #[error("task panicked: {0}")]
    Panicked(String),

    #[error("global executor already initialized")]
    AlreadyInitialized,

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<tokio::sync::oneshot::error::RecvError> for Error {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        Error::Discarded
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}
