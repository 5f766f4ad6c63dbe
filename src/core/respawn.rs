//! # Per-participant respawn supervision.
//!
//! A dead participant may need the engine to accept a forced-respawn
//! request, and that request can legitimately fail while the client is not
//! yet ready. Each casualty therefore gets a supervisor: a periodic retry
//! task that keeps requesting a respawn until the participant is alive,
//! disconnects, the engine declares the operation unsupported, or a fixed
//! attempt budget runs out.
//!
//! The attempt counter is an explicit machine ([`RespawnSupervisor`]), not
//! a captured closure; the driver ([`SupervisorDriver`]) pumps it on the
//! scheduler and owns the interaction with the engine.
//!
//! ## Rules
//! - At most one live supervisor per participant; a fresh death or a
//!   manual respawn cancels the old one before anything else happens.
//! - Exhausting the budget degrades to a manual prompt, never an error.
//! - An unsupported engine means immediate fail-soft discard.

use std::ops::ControlFlow;

use async_trait::async_trait;

use crate::engine::ParticipantId;
use crate::error::EngineError;
use crate::events::{ResetEvent, ResetEventKind};

use super::coordinator::{CycleCtx, MANUAL_RESPAWN_PROMPT};
use super::scheduler::PeriodicTask;

/// What the engine reports about a supervised participant this tick.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ParticipantProbe {
    pub connected: bool,
    pub dead: bool,
}

/// Why a supervisor stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DiscardReason {
    /// Participant no longer in the dead state; observer prep done.
    Finalized,
    /// Participant left the server.
    Disconnected,
    /// Engine cannot force-respawn in this context.
    Unsupported,
    /// Retry budget spent; participant was prompted to respawn manually.
    Exhausted,
}

impl DiscardReason {
    pub fn as_label(&self) -> &'static str {
        match self {
            DiscardReason::Finalized => "finalized",
            DiscardReason::Disconnected => "disconnected",
            DiscardReason::Unsupported => "unsupported",
            DiscardReason::Exhausted => "exhausted",
        }
    }
}

/// Decision for one supervisor tick, before any engine mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RespawnStep {
    /// Stop and discard for the given reason.
    Discard(DiscardReason),
    /// Participant is alive again: teleport, observer prep, discard.
    Finalize,
    /// Still dead: issue a forced-respawn request.
    Attempt,
}

/// Retry state for one participant's forced respawn.
#[derive(Debug)]
pub(crate) struct RespawnSupervisor {
    participant: ParticipantId,
    attempts: u32,
    budget: u32,
}

impl RespawnSupervisor {
    pub fn new(participant: ParticipantId, budget: u32) -> Self {
        Self {
            participant,
            attempts: 0,
            budget,
        }
    }

    pub fn participant(&self) -> ParticipantId {
        self.participant
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Classifies the tick from the engine's view of the participant.
    pub fn assess(&self, probe: ParticipantProbe) -> RespawnStep {
        if !probe.connected {
            return RespawnStep::Discard(DiscardReason::Disconnected);
        }
        if !probe.dead {
            return RespawnStep::Finalize;
        }
        RespawnStep::Attempt
    }

    /// Counts one forced-respawn attempt. Returns `true` when the budget
    /// is now spent.
    pub fn record_attempt(&mut self) -> bool {
        self.attempts += 1;
        self.attempts >= self.budget
    }
}

/// Periodic driver for one participant's [`RespawnSupervisor`].
pub(crate) struct SupervisorDriver {
    pub ctx: CycleCtx,
    pub machine: RespawnSupervisor,
    pub token: tokio_util::sync::CancellationToken,
}

impl SupervisorDriver {
    /// Removes this supervisor's own map entry (unless it was superseded,
    /// in which case the entry already belongs to a newer task) and
    /// publishes the discard event. Caller holds the state lock.
    fn discard(&self, st: &mut crate::core::state::ResetState, reason: DiscardReason) {
        let id = self.machine.participant();
        if !self.token.is_cancelled() {
            st.supervisors.remove(&id);
        }
        self.ctx.bus.publish(
            ResetEvent::now(ResetEventKind::SupervisorDiscarded)
                .with_participant(id)
                .with_attempt(self.machine.attempts())
                .with_detail(reason.as_label()),
        );
    }
}

#[async_trait]
impl PeriodicTask for SupervisorDriver {
    async fn tick(&mut self) -> ControlFlow<()> {
        let id = self.machine.participant();

        // Single-mutator: the lock is held for the whole tick, so a
        // concurrent death/respawn handler cannot race this supervisor on
        // the same participant.
        let state = self.ctx.state.clone();
        let mut st = state.lock().await;
        if self.token.is_cancelled() {
            return ControlFlow::Break(());
        }

        let probe = ParticipantProbe {
            connected: self.ctx.engine.is_connected(id).await,
            dead: self.ctx.engine.is_dead(id).await,
        };

        match self.machine.assess(probe) {
            RespawnStep::Discard(reason) => {
                self.discard(&mut st, reason);
                ControlFlow::Break(())
            }
            RespawnStep::Finalize => {
                if let Some(anchor) = st.anchor {
                    self.ctx.engine.teleport(id, anchor).await;
                }
                self.ctx.prepare_observer(id).await;
                self.discard(&mut st, DiscardReason::Finalized);
                ControlFlow::Break(())
            }
            RespawnStep::Attempt => match self.ctx.engine.force_respawn(id).await {
                Ok(()) => self.after_attempt(&mut st, id).await,
                Err(err) if err.is_retryable() => self.after_attempt(&mut st, id).await,
                Err(EngineError::Disconnected) => {
                    self.discard(&mut st, DiscardReason::Disconnected);
                    ControlFlow::Break(())
                }
                Err(_) => {
                    self.discard(&mut st, DiscardReason::Unsupported);
                    ControlFlow::Break(())
                }
            },
        }
    }
}

impl SupervisorDriver {
    async fn after_attempt(
        &mut self,
        st: &mut crate::core::state::ResetState,
        id: ParticipantId,
    ) -> ControlFlow<()> {
        if self.machine.record_attempt() {
            self.ctx.engine.send_message(id, MANUAL_RESPAWN_PROMPT).await;
            self.discard(st, DiscardReason::Exhausted);
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(connected: bool, dead: bool) -> ParticipantProbe {
        ParticipantProbe { connected, dead }
    }

    #[test]
    fn test_disconnected_wins_over_everything() {
        let sup = RespawnSupervisor::new(ParticipantId::random(), 10);
        assert_eq!(
            sup.assess(probe(false, true)),
            RespawnStep::Discard(DiscardReason::Disconnected)
        );
        assert_eq!(
            sup.assess(probe(false, false)),
            RespawnStep::Discard(DiscardReason::Disconnected)
        );
    }

    #[test]
    fn test_alive_participant_finalizes() {
        let sup = RespawnSupervisor::new(ParticipantId::random(), 10);
        assert_eq!(sup.assess(probe(true, false)), RespawnStep::Finalize);
    }

    #[test]
    fn test_dead_participant_gets_an_attempt() {
        let sup = RespawnSupervisor::new(ParticipantId::random(), 10);
        assert_eq!(sup.assess(probe(true, true)), RespawnStep::Attempt);
    }

    #[test]
    fn test_budget_exhausts_on_tenth_attempt() {
        let mut sup = RespawnSupervisor::new(ParticipantId::random(), 10);
        for _ in 0..9 {
            assert!(!sup.record_attempt());
        }
        assert!(sup.record_attempt());
        assert_eq!(sup.attempts(), 10);
    }
}
