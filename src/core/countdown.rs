//! # Countdown state machine and its periodic driver.
//!
//! The countdown ticks once per second for a fixed total, announcing the
//! remaining time only at configured checkpoints. The counter is an
//! explicit machine ([`Countdown`]), not a captured closure, so tests can
//! drive it directly and the driver stays a dumb pump.
//!
//! ```text
//! Running(n) ──tick──► Running(n-1)   announce iff n is a checkpoint
//! Running(0) ──tick──► Terminal       clear handle, invoke signaling
//! ```

use std::ops::ControlFlow;

use async_trait::async_trait;

use crate::events::{ResetEvent, ResetEventKind};

use super::coordinator::{checkpoint_message, CycleCtx};
use super::scheduler::PeriodicTask;

/// Phase of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CountdownPhase {
    /// Counting down; the value is the seconds remaining.
    Running(u32),
    /// Reached zero; signaling has been invoked.
    Terminal,
}

/// Result of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CountdownStep {
    /// The remaining time should be broadcast.
    Announce(u32),
    /// A second passed without an announcement.
    Quiet(u32),
    /// The countdown entered (or already was in) the terminal phase.
    Finished,
}

/// Seconds-remaining counter for one countdown run.
#[derive(Debug)]
pub(crate) struct Countdown {
    phase: CountdownPhase,
}

impl Countdown {
    pub fn new(total_seconds: u32) -> Self {
        Self {
            phase: CountdownPhase::Running(total_seconds),
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> CountdownPhase {
        self.phase
    }

    /// Advances the machine by one second.
    ///
    /// `checkpoints` is the set of remaining-second values that get an
    /// announcement; all other values pass quietly.
    pub fn tick(&mut self, checkpoints: &[u32]) -> CountdownStep {
        match self.phase {
            CountdownPhase::Running(0) => {
                self.phase = CountdownPhase::Terminal;
                CountdownStep::Finished
            }
            CountdownPhase::Running(secs) => {
                self.phase = CountdownPhase::Running(secs - 1);
                if checkpoints.contains(&secs) {
                    CountdownStep::Announce(secs)
                } else {
                    CountdownStep::Quiet(secs)
                }
            }
            CountdownPhase::Terminal => CountdownStep::Finished,
        }
    }
}

/// Periodic driver pumping a [`Countdown`] once per second.
///
/// Holds the cycle context and its own cancellation token; on finish it
/// clears the countdown handle (unless superseded) and invokes reset
/// signaling.
pub(crate) struct CountdownDriver {
    pub ctx: CycleCtx,
    pub machine: Countdown,
    pub token: tokio_util::sync::CancellationToken,
}

#[async_trait]
impl PeriodicTask for CountdownDriver {
    async fn tick(&mut self) -> ControlFlow<()> {
        // Single-mutator: the lock is held for the whole tick. Cancellation
        // may land while parked on the lock, so re-check the token here.
        let mut st = self.ctx.state.lock().await;
        if self.token.is_cancelled() {
            return ControlFlow::Break(());
        }

        match self.machine.tick(&self.ctx.cfg.checkpoints) {
            CountdownStep::Announce(secs) => {
                self.ctx.engine.broadcast(&checkpoint_message(secs)).await;
                self.ctx.bus.publish(
                    ResetEvent::now(ResetEventKind::CountdownCheckpoint).with_seconds(secs),
                );
                ControlFlow::Continue(())
            }
            CountdownStep::Quiet(_) => ControlFlow::Continue(()),
            CountdownStep::Finished => {
                st.countdown = None;
                self.ctx.signal_reset().await;
                ControlFlow::Break(())
            }
        }
    }
}
