//! # Tick-based scheduling over tokio.
//!
//! The engine's time base is a fixed-rate tick (20 ticks per second). This
//! module maps tick counts onto tokio timers and wraps every scheduled
//! action in a [`TaskHandle`]: a join handle plus a
//! [`CancellationToken`] that must be cancelled before a semantically
//! conflicting action is created.
//!
//! ## Rules
//! - No blocking sleeps: all waiting is cancellable [`tokio::time::sleep`].
//! - Dropping a [`TaskHandle`] detaches the task; stopping is always an
//!   explicit [`TaskHandle::cancel`].
//! - Cancellation is observed at safe points only: before each periodic
//!   tick and during every sleep. A tick that already started runs to
//!   completion.

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;

/// Fixed-rate engine ticks per second.
pub const TICKS_PER_SECOND: u32 = 20;

/// Duration of one engine tick (50 ms).
pub const TICK: Duration = Duration::from_millis(1000 / TICKS_PER_SECOND as u64);

/// Converts a tick count into a [`Duration`].
pub fn ticks(n: u32) -> Duration {
    TICK * n
}

/// Handle to a scheduled action.
///
/// Holds the spawned task's join handle and its cancellation token.
/// Dropping the handle does **not** cancel the task.
#[derive(Debug)]
pub struct TaskHandle {
    join: JoinHandle<()>,
    token: CancellationToken,
}

impl TaskHandle {
    /// Requests cancellation. The task exits at its next safe point.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Whether the underlying task has finished running.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Returns a clone of the task's cancellation token.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

/// A periodic action driven by [`schedule_repeating`].
///
/// The scheduler owns the task value, so per-run state (attempt counters,
/// countdown position) lives in explicit fields rather than captured
/// closures.
#[async_trait]
pub trait PeriodicTask: Send + 'static {
    /// Runs one period. Return [`ControlFlow::Break`] to stop the schedule.
    async fn tick(&mut self) -> ControlFlow<()>;
}

/// Sleeps for `n` ticks unless the token is cancelled first.
///
/// Returns `false` if the sleep was interrupted by cancellation.
pub(crate) async fn sleep_ticks(n: u32, token: &CancellationToken) -> bool {
    tokio::select! {
        _ = time::sleep(ticks(n)) => true,
        _ = token.cancelled() => false,
    }
}

/// Spawns an immediate task under a caller-supplied token.
///
/// The future is responsible for watching the token itself; this helper
/// only packages the pair into a [`TaskHandle`].
pub fn spawn_with_token<Fut>(token: CancellationToken, fut: Fut) -> TaskHandle
where
    Fut: Future<Output = ()> + Send + 'static,
{
    let join = tokio::spawn(fut);
    TaskHandle { join, token }
}

/// Schedules a one-shot action after `delay_ticks`.
///
/// The action receives the task's own token so it can keep honoring
/// cancellation across internal await points.
pub fn schedule_once<F, Fut>(delay_ticks: u32, action: F) -> TaskHandle
where
    F: FnOnce(CancellationToken) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let token = CancellationToken::new();
    let t = token.clone();
    let join = tokio::spawn(async move {
        if !sleep_ticks(delay_ticks, &t).await {
            return;
        }
        action(t.clone()).await;
    });
    TaskHandle { join, token }
}

/// Schedules a periodic action: first run after `initial_delay_ticks`,
/// then every `period_ticks` until it breaks or is cancelled.
pub fn schedule_repeating<T>(initial_delay_ticks: u32, period_ticks: u32, task: T) -> TaskHandle
where
    T: PeriodicTask,
{
    schedule_repeating_with(
        CancellationToken::new(),
        initial_delay_ticks,
        period_ticks,
        task,
    )
}

/// [`schedule_repeating`] with a caller-supplied token.
///
/// Used when the task itself needs to observe its own token (a supervisor
/// deciding whether it was superseded before discarding shared state).
pub fn schedule_repeating_with<T>(
    token: CancellationToken,
    initial_delay_ticks: u32,
    period_ticks: u32,
    mut task: T,
) -> TaskHandle
where
    T: PeriodicTask,
{
    let t = token.clone();
    let join = tokio::spawn(async move {
        if !sleep_ticks(initial_delay_ticks, &t).await {
            return;
        }
        loop {
            if t.is_cancelled() {
                break;
            }
            if task.tick().await.is_break() {
                break;
            }
            if !sleep_ticks(period_ticks, &t).await {
                break;
            }
        }
    });
    TaskHandle { join, token }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    struct CountTo {
        hits: Arc<AtomicU32>,
        stop_at: u32,
    }

    #[async_trait]
    impl PeriodicTask for CountTo {
        async fn tick(&mut self) -> ControlFlow<()> {
            let n = self.hits.fetch_add(1, Ordering::SeqCst) + 1;
            if n >= self.stop_at {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }
    }

    #[test]
    fn test_tick_unit() {
        assert_eq!(ticks(20), Duration::from_secs(1));
        assert_eq!(ticks(1), Duration::from_millis(50));
        assert_eq!(ticks(0), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_once_fires_after_delay() {
        let fired = Arc::new(AtomicU32::new(0));
        let f = fired.clone();
        let handle = schedule_once(60, move |_| async move {
            f.fetch_add(1, Ordering::SeqCst);
        });

        time::sleep(ticks(59)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        time::sleep(ticks(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_once_cancel_prevents_run() {
        let fired = Arc::new(AtomicU32::new(0));
        let f = fired.clone();
        let handle = schedule_once(20, move |_| async move {
            f.fetch_add(1, Ordering::SeqCst);
        });
        handle.cancel();

        time::sleep(ticks(40)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_repeating_breaks_itself() {
        let hits = Arc::new(AtomicU32::new(0));
        let task = CountTo {
            hits: hits.clone(),
            stop_at: 3,
        };
        let handle = schedule_repeating(1, 4, task);

        time::sleep(ticks(20)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_repeating_cancel_stops_ticks() {
        let hits = Arc::new(AtomicU32::new(0));
        let task = CountTo {
            hits: hits.clone(),
            stop_at: u32::MAX,
        };
        let handle = schedule_repeating(1, 4, task);

        time::sleep(ticks(6)).await;
        let before = hits.load(Ordering::SeqCst);
        assert!(before >= 1);

        handle.cancel();
        time::sleep(ticks(40)).await;
        assert_eq!(hits.load(Ordering::SeqCst), before);
    }
}
