//! # resetvisor
//!
//! **Resetvisor** coordinates a server-wide "permadeath reset" ritual for a
//! multiplayer game session: the first participant death arms a global
//! reset, everyone currently connected is forced into a non-interactive
//! observation state, a countdown is broadcast, and at zero the process
//! signals an external supervisor (via a flag file) to rebuild the world,
//! then shuts the engine down.
//!
//! The hard part is not any single action but the coordination: one shared
//! record of cycle state is mutated by asynchronous game events (death,
//! respawn, join) and by independently running timers (countdown ticks,
//! per-participant respawn retries), and all of it must converge to one
//! consistent outcome with no double-triggering, nobody left outside
//! observation mode, and no leaked timers.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   death/respawn/join notices          engine primitives
//!  (host adapter, single thread)   (teleport, health, chat, ...)
//!              │                               ▲
//!              ▼                               │
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Coordinator (GameHandler)                                  │
//! │  - ResetState (one mutex, held per callback)                │
//! │  - Bus (broadcast observability events)                     │
//! └──────┬──────────────────┬──────────────────┬────────────────┘
//!        ▼                  ▼                  ▼
//!  ┌────────────┐   ┌──────────────────┐   ┌──────────────┐
//!  │ initiation │   │ respawn          │   │ countdown    │
//!  │ (one-shot, │   │ supervisors      │   │ driver       │
//!  │  3 s + 1 s)│   │ (one per dead    │   │ (1 s period, │
//!  └────────────┘   │  participant)    │   │  60 → 0)     │
//!                   └──────────────────┘   └──────┬───────┘
//!                                                 ▼
//!                                     flag file + final broadcast
//!                                         + engine shutdown
//! ```
//!
//! ### Lifecycle
//! ```text
//! first death ──► armed (anchor = death spot, never rewritten)
//!   ├─► trigger message + "reset begins in 3 seconds" broadcast
//!   ├─► respawn supervisor for the victim
//!   └─► initiation scheduled 3 s out:
//!         quiet-kill every connected non-casualty
//!         1 s later: observer mode + teleport to anchor for everyone
//!         start countdown (checkpoints 60,50,40,30,20,10,5..1)
//!               └─► at zero: reset.flag (create-if-absent),
//!                   "Restarting now...", shutdown command
//! ```
//!
//! Later deaths never re-arm; they are folded into the same cycle as
//! casualties. The cycle has no un-arm path short of process teardown.
//!
//! ## Features
//! | Area               | Description                                          | Key types / traits                    |
//! |--------------------|------------------------------------------------------|---------------------------------------|
//! | **Coordination**   | Arming, casualty folding, lockdown, signaling.       | [`Coordinator`], [`GameHandler`]      |
//! | **Engine seam**    | Primitive operations the host adapter implements.    | [`engine::Engine`], [`EngineError`]   |
//! | **Scheduling**     | Tick-based cancellable one-shot/periodic actions.    | [`TaskHandle`], [`PeriodicTask`]      |
//! | **Observability**  | Broadcast events, subscriber fan-out, stdout logger. | [`ResetEvent`], [`Subscribe`]         |
//! | **Configuration**  | Fixed cycle parameters with production defaults.     | [`ResetConfig`]                       |
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use resetvisor::{Coordinator, LogWriter, ResetConfig, Subscribe, SubscriberSet};
//! # use resetvisor::engine::Engine;
//! # fn engine_adapter() -> Arc<dyn Engine> { unimplemented!() }
//!
//! # async fn wire() {
//! let engine: Arc<dyn Engine> = engine_adapter();
//! let coordinator = Coordinator::new(ResetConfig::default(), engine);
//!
//! let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter)];
//! let _listener = SubscriberSet::new(subs).spawn_listener(coordinator.bus());
//!
//! // Register `coordinator` as the GameHandler for death/respawn/join
//! // notices; the host adapter owns that wiring.
//! # }
//! ```

mod config;
mod core;
mod error;
mod subscribers;

pub mod engine;
pub mod events;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::{ResetConfig, DEFAULT_CHECKPOINTS};
pub use crate::core::{
    schedule_once, schedule_repeating, schedule_repeating_with, spawn_with_token, ticks,
    Coordinator, PeriodicTask, ResetSnapshot, TaskHandle, TICK, TICKS_PER_SECOND,
};
pub use error::EngineError;
pub use events::{
    Bus, DeathNotice, GameHandler, JoinNotice, RespawnNotice, ResetEvent, ResetEventKind,
};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
