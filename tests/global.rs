mod common;

use coalesce::runtime::{self, Error, ExecutorConfig, global};
use common::{TIMEOUT, init_tracing};
use std::sync::mpsc;
use std::thread;

// Single test: the global executor is shared by everything in this binary.
#[test]
fn test_global_executor_lifecycle() {
    init_tracing();

    let config = ExecutorConfig::default().with_thread_name("global-preview");
    runtime::init_with_config(config).unwrap();
    assert!(matches!(runtime::init(), Err(Error::AlreadyInitialized)));

    let first = global::executor().unwrap();
    let second = global::executor().unwrap();
    assert!(std::ptr::eq(first, second));
    assert_eq!(first.thread_name(), "global-preview");

    let (tx, rx) = mpsc::channel();
    runtime::submit(move || {
        tx.send(thread::current().name().map(str::to_string)).unwrap();
    })
    .unwrap();

    assert_eq!(
        rx.recv_timeout(TIMEOUT).unwrap().as_deref(),
        Some("global-preview")
    );
    assert!(first.is_running());
}
