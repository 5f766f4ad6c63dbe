//! # Observability events emitted by the reset coordinator.
//!
//! The [`ResetEventKind`] enum classifies everything the coordinator does to
//! the cycle: arming, casualty bookkeeping, supervisor lifecycle, countdown
//! progress, and the terminal signaling steps. The [`ResetEvent`] struct
//! carries the metadata for each kind: participant, position, seconds,
//! attempt number, error label.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore exact order when events are consumed
//! out of order.
//!
//! ## Example
//! ```rust
//! use resetvisor::{ResetEvent, ResetEventKind};
//! use resetvisor::engine::ParticipantId;
//!
//! let p = ParticipantId::random();
//! let ev = ResetEvent::now(ResetEventKind::CasualtyRecorded)
//!     .with_participant(p)
//!     .with_detail("died during reset");
//!
//! assert_eq!(ev.kind, ResetEventKind::CasualtyRecorded);
//! assert_eq!(ev.participant, Some(p));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::engine::{ParticipantId, Position};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of reset cycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetEventKind {
    // === Cycle lifecycle ===
    /// First death observed; the cycle is now armed.
    ///
    /// Sets: `participant` (trigger), `position` (anchor), `at`, `seq`.
    Armed,

    /// A participant was folded into the cycle as a casualty.
    ///
    /// Sets: `participant`, `detail` (message used, or `quiet_kill` for
    /// the sweep), `at`, `seq`.
    CasualtyRecorded,

    /// The quiet-kill sweep and anchor resolution ran.
    ///
    /// Sets: `position` (effective target), `at`, `seq`.
    Initiated,

    /// All connected participants were locked into observer mode at the
    /// target and the countdown was started.
    ///
    /// Sets: `position`, `seconds` (countdown total), `at`, `seq`.
    LockdownComplete,

    // === Respawn supervision ===
    /// A respawn supervisor was started (or replaced) for a participant.
    ///
    /// Sets: `participant`, `at`, `seq`.
    SupervisorStarted,

    /// A respawn supervisor stopped and discarded itself.
    ///
    /// Sets: `participant`, `detail` (reason: `finalized`, `disconnected`,
    /// `unsupported`, `exhausted`), `attempt` (attempts made), `at`, `seq`.
    SupervisorDiscarded,

    // === Countdown ===
    /// A countdown checkpoint was announced.
    ///
    /// Sets: `seconds` (remaining), `at`, `seq`.
    CountdownCheckpoint,

    // === Terminal signaling ===
    /// The reset flag was created (first signaling call only).
    ///
    /// Sets: `detail` (flag path), `at`, `seq`.
    FlagCreated,

    /// Creating the reset flag failed; shutdown proceeds anyway.
    ///
    /// Sets: `detail` (io error), `at`, `seq`.
    FlagWriteFailed,

    /// The engine shutdown command was issued.
    ///
    /// Sets: `at`, `seq`.
    ShutdownIssued,

    /// The coordinator was torn down; all timers cancelled, state cleared.
    ///
    /// Sets: `at`, `seq`.
    TornDown,
}

/// A single reset cycle event with metadata.
///
/// Construct with [`ResetEvent::now`] and attach fields with the `with_*`
/// builders; unset fields stay `None`.
#[derive(Debug, Clone)]
pub struct ResetEvent {
    /// What happened.
    pub kind: ResetEventKind,
    /// Participant the event concerns, if any.
    pub participant: Option<ParticipantId>,
    /// Position attached to the event (anchor, target), if any.
    pub position: Option<Position>,
    /// Seconds value (countdown remaining/total), if any.
    pub seconds: Option<u32>,
    /// Attempt count (supervisor events), if any.
    pub attempt: Option<u32>,
    /// Free-form detail: message text, discard reason, error label.
    pub detail: Option<String>,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Globally monotonic sequence number.
    pub seq: u64,
}

impl ResetEvent {
    /// Creates an event of the given kind stamped with the current time and
    /// the next global sequence number.
    pub fn now(kind: ResetEventKind) -> Self {
        Self {
            kind,
            participant: None,
            position: None,
            seconds: None,
            attempt: None,
            detail: None,
            at: SystemTime::now(),
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
        }
    }

    /// Attaches the participant the event concerns.
    pub fn with_participant(mut self, id: ParticipantId) -> Self {
        self.participant = Some(id);
        self
    }

    /// Attaches a position.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Attaches a seconds value.
    pub fn with_seconds(mut self, seconds: u32) -> Self {
        self.seconds = Some(seconds);
        self
    }

    /// Attaches an attempt count.
    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = Some(attempt);
        self
    }

    /// Attaches free-form detail text.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = ResetEvent::now(ResetEventKind::Armed);
        let b = ResetEvent::now(ResetEventKind::CasualtyRecorded);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builders_set_fields() {
        let p = ParticipantId::random();
        let ev = ResetEvent::now(ResetEventKind::SupervisorDiscarded)
            .with_participant(p)
            .with_attempt(10)
            .with_detail("exhausted");
        assert_eq!(ev.participant, Some(p));
        assert_eq!(ev.attempt, Some(10));
        assert_eq!(ev.detail.as_deref(), Some("exhausted"));
        assert!(ev.position.is_none());
    }
}
