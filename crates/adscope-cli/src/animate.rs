//! Count-up animation for the report stat tiles.

use std::time::{Duration, Instant};

use adscope_core::CountUp;
use tokio::task::JoinHandle;

/// Interval between animation frames.
pub(crate) const FRAME: Duration = Duration::from_millis(16);

/// A running count-up. Dropping it stops the animation.
pub(crate) struct CountUpTask {
    handle: JoinHandle<()>,
}

impl CountUpTask {
    /// Starts counting every counter from zero, calling `on_frame` with the
    /// current values on each tick. The last frame always carries the
    /// exact targets.
    pub(crate) fn spawn<F>(counters: [CountUp; 4], frame: Duration, on_frame: F) -> Self
    where
        F: Fn([u64; 4]) + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let started = Instant::now();
            let mut ticker = tokio::time::interval(frame);
            loop {
                ticker.tick().await;
                let elapsed = started.elapsed();
                on_frame(counters.map(|c| c.value_at(elapsed)));
                if counters.iter().all(|c| c.is_finished(elapsed)) {
                    break;
                }
            }
        });
        Self { handle }
    }

    /// Waits for the final frame.
    pub(crate) async fn finish(mut self) {
        if let Err(e) = (&mut self.handle).await {
            tracing::debug!(error = %e, "count-up task ended early");
        }
    }
}

impl Drop for CountUpTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn counters(targets: [u64; 4], duration: Duration) -> [CountUp; 4] {
        targets.map(|target| CountUp { target, duration })
    }

    #[tokio::test]
    async fn finish_ends_on_exact_targets() {
        let frames = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&frames);
        let task = CountUpTask::spawn(
            counters([42, 3, 10, 0], Duration::from_millis(60)),
            Duration::from_millis(10),
            move |values| sink.lock().unwrap().push(values),
        );
        task.finish().await;

        let frames = frames.lock().unwrap();
        assert_eq!(frames.last(), Some(&[42, 3, 10, 0]));
        assert!(frames.windows(2).all(|w| w[0][0] <= w[1][0]));
    }

    #[tokio::test]
    async fn dropping_stops_the_animation() {
        let frames = Arc::new(Mutex::new(0_usize));
        let sink = Arc::clone(&frames);
        let task = CountUpTask::spawn(
            counters([1_000, 0, 0, 0], Duration::from_secs(60)),
            Duration::from_millis(5),
            move |_| *sink.lock().unwrap() += 1,
        );
        tokio::time::sleep(Duration::from_millis(30)).await;
        drop(task);
        tokio::time::sleep(Duration::from_millis(10)).await;

        let after_drop = *frames.lock().unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(*frames.lock().unwrap(), after_drop);
    }
}
