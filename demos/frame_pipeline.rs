use coalesce::{CoalescingExecutor, ExecutorConfig};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

const FRAMES: u64 = 300;
// A 240 fps producer feeding a processor that needs ~12 ms per frame.
const FRAME_INTERVAL: Duration = Duration::from_micros(4_167);
const PROCESSING_TIME: Duration = Duration::from_millis(12);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let executor =
        CoalescingExecutor::with_config(ExecutorConfig::default().with_thread_name("preview"))?;
    let last_rendered = Arc::new(AtomicU64::new(0));

    for frame in 1..=FRAMES {
        let last_rendered = last_rendered.clone();
        executor.submit(move || {
            thread::sleep(PROCESSING_TIME);
            last_rendered.store(frame, Ordering::SeqCst);
        });
        thread::sleep(FRAME_INTERVAL);
    }

    executor.shutdown()?;

    let stats = executor.stats();
    info!(
        frames = FRAMES,
        rendered = stats.executed,
        skipped = stats.superseded,
        last = last_rendered.load(Ordering::SeqCst),
        "Preview pipeline finished"
    );
    println!("{}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}
