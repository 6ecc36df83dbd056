#![allow(dead_code)]

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use coalesce::CoalescingExecutor;
use tracing_subscriber::EnvFilter;

pub const TIMEOUT: Duration = Duration::from_secs(5);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Occupies the worker until the returned sender fires (or is dropped).
///
/// Returns once the blocking task has actually started running.
pub fn occupy_worker(executor: &CoalescingExecutor) -> Sender<()> {
    let (started_tx, started_rx) = mpsc::channel();
    let (gate_tx, gate_rx): (Sender<()>, Receiver<()>) = mpsc::channel();

    executor.submit(move || {
        started_tx.send(()).unwrap();
        let _ = gate_rx.recv();
    });

    started_rx
        .recv_timeout(TIMEOUT)
        .expect("blocking task never started");
    gate_tx
}

/// Polls `condition` until it holds or the timeout elapses.
pub fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + TIMEOUT;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    condition()
}
