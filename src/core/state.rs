//! # Shared reset cycle state.
//!
//! [`ResetState`] is the single mutable record of one reset cycle. It is
//! owned by the [`Coordinator`](crate::Coordinator) behind one mutex that
//! every callback holds for its full duration (the single-mutator model),
//! so no two callbacks ever observe it mid-mutation.
//!
//! ## Invariants
//! - unarmed ⇒ casualties and pending messages are empty, no anchor
//! - the anchor is set exactly once per cycle and never rewritten
//! - at most one live supervisor handle per participant (cancel-then-replace)
//! - a pending message exists only between being recorded and the next
//!   death notice for the same participant
//!
//! There is no un-arm path; once triggered the cycle runs to the terminal
//! shutdown. [`ResetState::clear`] exists only for teardown.

use std::collections::{HashMap, HashSet};

use crate::engine::{ParticipantId, Position};

use super::scheduler::TaskHandle;

/// Mutable state of the current reset cycle.
#[derive(Debug, Default)]
pub(crate) struct ResetState {
    /// True once any death has triggered the reset. Monotonic per cycle.
    pub armed: bool,
    /// Position all participants converge to. Set once on arming.
    pub anchor: Option<Position>,
    /// Participants already accounted for in this cycle.
    pub casualties: HashSet<ParticipantId>,
    /// One-shot overrides for the next death notice per participant.
    pub pending_messages: HashMap<ParticipantId, String>,
    /// Running countdown, if any.
    pub countdown: Option<TaskHandle>,
    /// The one-shot reset initiation task, if scheduled.
    pub initiation: Option<TaskHandle>,
    /// Live respawn supervisors, at most one per participant.
    pub supervisors: HashMap<ParticipantId, TaskHandle>,
    /// Short-lived observer prep tasks (respawn/join follow-ups).
    pub preps: Vec<TaskHandle>,
}

impl ResetState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the cycle with the given anchor.
    ///
    /// Clears casualties and pending messages first. Both are already empty
    /// in the unarmed state; the clear is kept defensively and is not
    /// load-bearing. Calling `arm` on an armed state is a bug; the anchor
    /// is never rewritten.
    pub fn arm(&mut self, anchor: Position) {
        debug_assert!(!self.armed, "arm called on an armed cycle");
        self.casualties.clear();
        self.pending_messages.clear();
        self.armed = true;
        self.anchor = Some(anchor);
    }

    /// Records a casualty. Returns `true` if the participant was new.
    pub fn record_casualty(&mut self, id: ParticipantId) -> bool {
        self.casualties.insert(id)
    }

    /// Stores the one-shot death message override for a participant.
    pub fn set_pending_message(&mut self, id: ParticipantId, message: String) {
        self.pending_messages.insert(id, message);
    }

    /// Consumes the pending death message for a participant, if any.
    pub fn take_pending_message(&mut self, id: ParticipantId) -> Option<String> {
        self.pending_messages.remove(&id)
    }

    /// Cancels and removes the participant's supervisor, if present.
    pub fn cancel_supervisor(&mut self, id: ParticipantId) {
        if let Some(old) = self.supervisors.remove(&id) {
            old.cancel();
        }
    }

    /// Installs a new supervisor handle, cancelling any previous one first.
    pub fn install_supervisor(&mut self, id: ParticipantId, handle: TaskHandle) {
        self.cancel_supervisor(id);
        self.supervisors.insert(id, handle);
    }

    /// Tracks a short-lived observer prep task so teardown can cancel it.
    /// Handles of finished preps are dropped on the way.
    pub fn install_prep(&mut self, handle: TaskHandle) {
        self.preps.retain(|h| !h.is_finished());
        self.preps.push(handle);
    }

    /// Installs the countdown handle, cancelling any previous one first.
    pub fn install_countdown(&mut self, handle: TaskHandle) {
        if let Some(old) = self.countdown.take() {
            old.cancel();
        }
        self.countdown = Some(handle);
    }

    /// Cancels every scheduled task and resets all fields to the unarmed
    /// state. Teardown only.
    pub fn clear(&mut self) {
        if let Some(h) = self.countdown.take() {
            h.cancel();
        }
        if let Some(h) = self.initiation.take() {
            h.cancel();
        }
        for (_, h) in self.supervisors.drain() {
            h.cancel();
        }
        for h in self.preps.drain(..) {
            h.cancel();
        }
        self.armed = false;
        self.anchor = None;
        self.casualties.clear();
        self.pending_messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scheduler::schedule_once;

    fn dummy_handle() -> TaskHandle {
        schedule_once(1, |_| async {})
    }

    #[test]
    fn test_unarmed_state_is_empty() {
        let st = ResetState::new();
        assert!(!st.armed);
        assert!(st.anchor.is_none());
        assert!(st.casualties.is_empty());
        assert!(st.pending_messages.is_empty());
        assert!(st.countdown.is_none());
        assert!(st.supervisors.is_empty());
    }

    #[test]
    fn test_arm_sets_anchor_once() {
        let mut st = ResetState::new();
        let anchor = Position::new(10.0, 64.0, 10.0);
        st.arm(anchor);
        assert!(st.armed);
        assert_eq!(st.anchor, Some(anchor));
    }

    #[test]
    fn test_casualty_insert_is_idempotent() {
        let mut st = ResetState::new();
        st.arm(Position::new(0.0, 64.0, 0.0));
        let p = ParticipantId::random();
        assert!(st.record_casualty(p));
        assert!(!st.record_casualty(p));
        assert_eq!(st.casualties.len(), 1);
    }

    #[test]
    fn test_pending_message_is_one_shot() {
        let mut st = ResetState::new();
        st.arm(Position::new(0.0, 64.0, 0.0));
        let p = ParticipantId::random();
        st.set_pending_message(p, "fell into the void".into());
        assert_eq!(
            st.take_pending_message(p).as_deref(),
            Some("fell into the void")
        );
        assert!(st.take_pending_message(p).is_none());
    }

    #[tokio::test]
    async fn test_install_supervisor_cancels_previous() {
        let mut st = ResetState::new();
        let p = ParticipantId::random();

        let first = dummy_handle();
        let first_token = first.token();
        st.install_supervisor(p, first);

        st.install_supervisor(p, dummy_handle());
        assert!(first_token.is_cancelled());
        assert_eq!(st.supervisors.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_cancels_everything() {
        let mut st = ResetState::new();
        st.arm(Position::new(1.0, 2.0, 3.0));
        let p = ParticipantId::random();
        st.record_casualty(p);
        st.set_pending_message(p, "msg".into());
        st.install_countdown(dummy_handle());
        st.initiation = Some(dummy_handle());
        st.install_supervisor(p, dummy_handle());
        st.install_prep(dummy_handle());

        let countdown_token = st.countdown.as_ref().unwrap().token();
        let sup_token = st.supervisors.get(&p).unwrap().token();
        let prep_token = st.preps[0].token();

        st.clear();
        assert!(!st.armed);
        assert!(st.anchor.is_none());
        assert!(st.casualties.is_empty());
        assert!(st.pending_messages.is_empty());
        assert!(st.countdown.is_none());
        assert!(st.initiation.is_none());
        assert!(st.supervisors.is_empty());
        assert!(st.preps.is_empty());
        assert!(countdown_token.is_cancelled());
        assert!(sup_token.is_cancelled());
        assert!(prep_token.is_cancelled());
    }
}
