//! # Reset coordinator: arming, lockdown, countdown, signaling.
//!
//! The [`Coordinator`] subscribes to game notices (death, respawn, join),
//! owns the [`ResetState`], and drives every scheduled action of a reset
//! cycle. It is the only component that reads or writes the state.
//!
//! ## Control flow
//! ```text
//! death notice ──► on_death ──┬─ unarmed: arm cycle, anchor = death spot,
//!                             │           trigger message, 3 s warning,
//!                             │           schedule initiation, supervise P
//!                             └─ armed:   fold P into casualties, pending
//!                                         or generic message, supervise P
//!
//! initiation (3 s later):
//!   resolve target ──► quiet-kill every connected non-casualty
//!   (1 s later)    ──► observer prep + teleport everyone ──► countdown
//!
//! countdown (1 s period, checkpoint broadcasts):
//!   Running(n) → ... → Terminal ──► flag file + final broadcast + shutdown
//! ```
//!
//! ## Single-mutator model
//! The host engine dispatches notices from one logical thread, but tokio
//! gives the timer tasks real parallelism. Every callback in this module
//! (notice handler, supervisor tick, countdown tick, initiation phase)
//! therefore takes the state mutex **for its whole duration**; interleaving
//! happens only between callbacks, never inside one.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::config::ResetConfig;
use crate::engine::{Engine, GameMode, ParticipantId, Position};
use crate::events::{
    Bus, DeathNotice, GameHandler, JoinNotice, RespawnNotice, ResetEvent, ResetEventKind,
};

use super::countdown::{Countdown, CountdownDriver};
use super::respawn::{RespawnSupervisor, SupervisorDriver};
use super::scheduler::{
    schedule_once, schedule_repeating_with, sleep_ticks, TICKS_PER_SECOND,
};
use super::signal;
use super::state::ResetState;

/// Food level the engine considers full.
const FOOD_LEVEL_FULL: u32 = 20;

/// Notice shown to participants joining mid-reset.
const RESET_IN_PROGRESS_NOTICE: &str = "Server reset in progress. Please wait.";

/// Prompt sent when the respawn retry budget runs out.
pub(crate) const MANUAL_RESPAWN_PROMPT: &str = "Click Respawn to spectate the reset.";

/// Final broadcast before the shutdown command.
const RESTARTING_NOW: &str = "Restarting now...";

fn trigger_message(name: &str) -> String {
    format!("{name} died and triggered the hardcore reset!")
}

fn warning_message(name: &str, seconds: u32) -> String {
    format!("{name} died! Server reset begins in {seconds} seconds.")
}

fn generic_death_message(name: &str) -> String {
    format!("{name} died during the hardcore reset.")
}

pub(crate) fn checkpoint_message(seconds: u32) -> String {
    format!("Server restarting in {seconds} seconds.")
}

/// Shared context threaded into every timer task of the cycle.
///
/// Cheap to clone; everything inside is an `Arc` or an `Arc`-backed sender.
#[derive(Clone)]
pub(crate) struct CycleCtx {
    pub cfg: Arc<ResetConfig>,
    pub engine: Arc<dyn Engine>,
    pub bus: Bus,
    pub state: Arc<Mutex<ResetState>>,
}

impl CycleCtx {
    /// Observer preparation: non-interactive flight-capable mode plus
    /// restored vitals, so nobody is stuck half-dead or grounded while
    /// the world is rebuilt. No-op for disconnected participants.
    pub(crate) async fn prepare_observer(&self, id: ParticipantId) {
        if !self.engine.is_connected(id).await {
            return;
        }
        self.engine.set_mode(id, GameMode::Observer).await;
        self.engine.set_flight(id, true).await;

        let max = self.engine.max_health(id).await;
        self.engine.set_health(id, max).await;
        self.engine.set_food_level(id, FOOD_LEVEL_FULL).await;
    }

    /// Starts (or replaces) the respawn supervisor for a participant.
    /// Caller holds the state lock.
    fn start_supervisor_locked(&self, st: &mut ResetState, id: ParticipantId) {
        let token = CancellationToken::new();
        let driver = SupervisorDriver {
            ctx: self.clone(),
            machine: RespawnSupervisor::new(id, self.cfg.respawn_retry_budget),
            token: token.clone(),
        };
        let handle = schedule_repeating_with(
            token,
            self.cfg.respawn_initial_delay_ticks,
            self.cfg.respawn_period_ticks,
            driver,
        );
        st.install_supervisor(id, handle);
        self.bus
            .publish(ResetEvent::now(ResetEventKind::SupervisorStarted).with_participant(id));
    }

    /// Starts the countdown, cancelling and replacing any existing one.
    /// Caller holds the state lock.
    fn start_countdown_locked(&self, st: &mut ResetState) {
        let token = CancellationToken::new();
        let driver = CountdownDriver {
            ctx: self.clone(),
            machine: Countdown::new(self.cfg.countdown_seconds),
            token: token.clone(),
        };
        // First tick immediately, then once per second.
        let handle = schedule_repeating_with(token, 0, TICKS_PER_SECOND, driver);
        st.install_countdown(handle);
    }

    /// Quiet kill: folds a connected participant into the cycle and forces
    /// their health to zero without re-triggering arming. The resulting
    /// death notice is intercepted by `on_death` and given the pending
    /// message. Caller holds the state lock.
    async fn quiet_kill_locked(&self, st: &mut ResetState, id: ParticipantId) {
        if !self.engine.is_connected(id).await {
            return;
        }
        if !st.record_casualty(id) {
            return;
        }

        let name = self
            .engine
            .participant_name(id)
            .await
            .unwrap_or_else(|| id.to_string());
        st.set_pending_message(id, generic_death_message(&name));

        if self.engine.health(id).await > 0.0 {
            self.engine.set_health(id, 0.0).await;
        }
        self.bus.publish(
            ResetEvent::now(ResetEventKind::CasualtyRecorded)
                .with_participant(id)
                .with_detail("quiet_kill"),
        );
    }

    /// The reset initiation sequence, scheduled a fixed delay after arming.
    ///
    /// Phase 1 resolves the effective target and sweeps every connected
    /// non-casualty with a quiet kill. Phase 2, one further delay later,
    /// locks everyone into observer mode at the target and starts the
    /// countdown.
    pub(crate) async fn run_initiation(self, token: CancellationToken) {
        let target = {
            let mut st = self.state.lock().await;
            if token.is_cancelled() {
                return;
            }
            let target = match st.anchor {
                Some(anchor) => anchor,
                None => self
                    .engine
                    .world_spawn()
                    .await
                    .unwrap_or(self.cfg.fallback_position),
            };
            for id in self.engine.connected_participants().await {
                self.quiet_kill_locked(&mut st, id).await;
            }
            self.bus
                .publish(ResetEvent::now(ResetEventKind::Initiated).with_position(target));
            target
        };

        if !sleep_ticks(self.cfg.observer_delay_ticks, &token).await {
            return;
        }

        let mut st = self.state.lock().await;
        if token.is_cancelled() {
            return;
        }
        for id in self.engine.connected_participants().await {
            self.prepare_observer(id).await;
            self.engine.teleport(id, target).await;
        }
        self.start_countdown_locked(&mut st);
        self.bus.publish(
            ResetEvent::now(ResetEventKind::LockdownComplete)
                .with_position(target)
                .with_seconds(self.cfg.countdown_seconds),
        );
    }

    /// Terminal signaling: idempotent flag creation, final broadcast,
    /// engine shutdown. A failed flag write is reported and otherwise
    /// ignored; the shutdown always proceeds.
    pub(crate) async fn signal_reset(&self) {
        let root = self.engine.world_root();
        match signal::create_flag(&root, &self.cfg.flag_name) {
            Ok(Some(path)) => self.bus.publish(
                ResetEvent::now(ResetEventKind::FlagCreated)
                    .with_detail(path.display().to_string()),
            ),
            Ok(None) => {}
            Err(err) => self.bus.publish(
                ResetEvent::now(ResetEventKind::FlagWriteFailed).with_detail(err.to_string()),
            ),
        }

        self.engine.broadcast(RESTARTING_NOW).await;
        self.engine.shutdown().await;
        self.bus.publish(ResetEvent::now(ResetEventKind::ShutdownIssued));
    }
}

/// Read-only copy of the cycle state for inspection and tests.
#[derive(Clone, Debug)]
pub struct ResetSnapshot {
    /// Whether a reset cycle is in progress.
    pub armed: bool,
    /// The convergence position, once set.
    pub anchor: Option<Position>,
    /// Participants accounted for in this cycle.
    pub casualties: Vec<ParticipantId>,
    /// Participants with an unconsumed death message override.
    pub pending_messages: Vec<ParticipantId>,
    /// Participants with a live respawn supervisor.
    pub supervised: Vec<ParticipantId>,
    /// Whether a countdown handle is installed.
    pub countdown_running: bool,
}

/// # Owner of the reset cycle.
///
/// Create one per process with [`Coordinator::new`], register it as the
/// [`GameHandler`] for death/respawn/join notices, and subscribe to
/// [`Coordinator::bus`] for observability. Call
/// [`Coordinator::teardown`] when the host shuts the plugin surface down.
pub struct Coordinator {
    ctx: CycleCtx,
}

impl Coordinator {
    /// Creates a coordinator with empty state.
    pub fn new(cfg: ResetConfig, engine: Arc<dyn Engine>) -> Arc<Self> {
        let bus = Bus::new(cfg.bus_capacity);
        Arc::new(Self {
            ctx: CycleCtx {
                cfg: Arc::new(cfg),
                engine,
                bus,
                state: Arc::new(Mutex::new(ResetState::new())),
            },
        })
    }

    /// The observability event bus.
    pub fn bus(&self) -> &Bus {
        &self.ctx.bus
    }

    /// The active configuration.
    pub fn config(&self) -> &ResetConfig {
        &self.ctx.cfg
    }

    /// Copies the current cycle state.
    pub async fn snapshot(&self) -> ResetSnapshot {
        let st = self.ctx.state.lock().await;
        ResetSnapshot {
            armed: st.armed,
            anchor: st.anchor,
            casualties: st.casualties.iter().copied().collect(),
            pending_messages: st.pending_messages.keys().copied().collect(),
            supervised: st.supervisors.keys().copied().collect(),
            countdown_running: st.countdown.is_some(),
        }
    }

    /// Cancels every scheduled task and clears the state.
    ///
    /// The host's disable path. There is no un-arm during normal
    /// operation; an armed cycle otherwise always reaches shutdown.
    pub async fn teardown(&self) {
        let mut st = self.ctx.state.lock().await;
        st.clear();
        self.ctx.bus.publish(ResetEvent::now(ResetEventKind::TornDown));
    }
}

#[async_trait]
impl GameHandler for Coordinator {
    async fn on_death(&self, notice: &mut DeathNotice) {
        let ctx = &self.ctx;
        let id = notice.participant;
        let mut st = ctx.state.lock().await;

        // A fresh death supersedes any stale supervisor.
        st.cancel_supervisor(id);

        if !st.armed {
            st.arm(notice.position);
            st.record_casualty(id);
            notice.message = trigger_message(&notice.name);

            let warn_secs = ctx.cfg.arm_delay_ticks / TICKS_PER_SECOND;
            ctx.engine
                .broadcast(&warning_message(&notice.name, warn_secs))
                .await;

            let init = ctx.clone();
            st.initiation = Some(schedule_once(ctx.cfg.arm_delay_ticks, move |token| {
                init.run_initiation(token)
            }));

            ctx.bus.publish(
                ResetEvent::now(ResetEventKind::Armed)
                    .with_participant(id)
                    .with_position(notice.position),
            );
            ctx.start_supervisor_locked(&mut st, id);
            return;
        }

        st.record_casualty(id);
        let message = st
            .take_pending_message(id)
            .unwrap_or_else(|| generic_death_message(&notice.name));
        notice.message = message.clone();
        ctx.bus.publish(
            ResetEvent::now(ResetEventKind::CasualtyRecorded)
                .with_participant(id)
                .with_detail(message),
        );
        ctx.start_supervisor_locked(&mut st, id);
    }

    async fn on_respawn(&self, notice: &mut RespawnNotice) {
        let ctx = &self.ctx;
        let mut st = ctx.state.lock().await;
        if !st.armed {
            return;
        }
        let Some(anchor) = st.anchor else { return };

        let id = notice.participant;
        // Manual respawn supersedes the auto-retry supervisor.
        st.cancel_supervisor(id);
        notice.destination = anchor;

        // Observer prep lands one tick later, once the respawn completed
        // engine-side. Tracked so teardown cancels it with the rest.
        let obs = ctx.clone();
        let handle = schedule_once(1, move |token| async move {
            let _st = obs.state.lock().await;
            if token.is_cancelled() {
                return;
            }
            obs.prepare_observer(id).await;
        });
        st.install_prep(handle);
    }

    async fn on_join(&self, notice: &JoinNotice) {
        let ctx = &self.ctx;
        let mut st = ctx.state.lock().await;
        if !st.armed {
            return;
        }
        let Some(anchor) = st.anchor else { return };

        let id = notice.participant;
        let late = ctx.clone();
        let handle = schedule_once(1, move |token| async move {
            let _st = late.state.lock().await;
            if token.is_cancelled() {
                return;
            }
            late.prepare_observer(id).await;
            late.engine.teleport(id, anchor).await;
            late.engine.send_message(id, RESET_IN_PROGRESS_NOTICE).await;
        });
        st.install_prep(handle);
    }
}
