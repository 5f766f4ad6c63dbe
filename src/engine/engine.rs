//! # Engine primitive seam.
//!
//! The coordinator never touches the game world directly; every effect
//! (teleport, mode change, health mutation, chat, shutdown) goes through
//! the [`Engine`] trait. The host adapter implements it on top of the real
//! game server; tests implement it over an in-memory world.
//!
//! ## Rules
//! - Primitives are fire-and-forget unless the coordinator reacts to failure:
//!   only [`Engine::force_respawn`] returns a `Result`, because a respawn
//!   request can be transiently rejected or unsupported (see
//!   [`EngineError`](crate::EngineError)).
//! - Queries about a disconnected participant return conservative defaults
//!   (`is_connected` = false, `is_dead` = false, `participant_name` = None);
//!   the coordinator checks connectivity before acting.
//! - The coordinator mutates a given participant's engine-side attributes
//!   from one code path at a time (supervisor cancellation precedes any
//!   competing action), so implementations need no per-participant locking
//!   on behalf of this crate.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::EngineError;

use super::participant::ParticipantId;
use super::position::Position;

/// Participant interaction modes the coordinator cares about.
///
/// Only [`GameMode::Observer`] is ever set by this crate; the others exist
/// so adapters can report the current mode faithfully.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameMode {
    /// Normal interactive play.
    Survival,
    /// Non-interactive, flight-capable, non-damageable observation.
    Observer,
}

/// # Primitive operations the coordinator invokes on the game engine.
///
/// Implementations must be safe to call from multiple spawned tasks; the
/// coordinator serializes conflicting calls per participant itself.
#[async_trait]
pub trait Engine: Send + Sync + 'static {
    /// Ids of every currently connected participant.
    async fn connected_participants(&self) -> Vec<ParticipantId>;

    /// Whether the participant is currently connected.
    async fn is_connected(&self, id: ParticipantId) -> bool;

    /// Display name, if the participant is known to the engine.
    async fn participant_name(&self, id: ParticipantId) -> Option<String>;

    /// Whether the participant is currently in the dead state
    /// (killed but not yet respawned).
    async fn is_dead(&self, id: ParticipantId) -> bool;

    /// Current health points.
    async fn health(&self, id: ParticipantId) -> f64;

    /// Maximum health from the participant's attributes.
    async fn max_health(&self, id: ParticipantId) -> f64;

    /// Sets health directly. Setting 0.0 kills the participant; the engine
    /// is expected to deliver a death notice for it afterwards.
    async fn set_health(&self, id: ParticipantId, health: f64);

    /// Sets the hunger/food level.
    async fn set_food_level(&self, id: ParticipantId, level: u32);

    /// Moves the participant to the given position.
    async fn teleport(&self, id: ParticipantId, target: Position);

    /// Switches the participant's interaction mode.
    async fn set_mode(&self, id: ParticipantId, mode: GameMode);

    /// Enables or disables flight (and puts the participant in the air
    /// when enabling).
    async fn set_flight(&self, id: ParticipantId, enabled: bool);

    /// Requests a forced respawn of a dead participant.
    ///
    /// May fail with [`EngineError::Rejected`] while the client is not yet
    /// ready (retryable) or [`EngineError::Unsupported`] when the engine
    /// cannot perform forced respawns in the current context (terminal).
    async fn force_respawn(&self, id: ParticipantId) -> Result<(), EngineError>;

    /// Sends a chat message to every connected participant.
    async fn broadcast(&self, message: &str);

    /// Sends a chat message to one participant.
    async fn send_message(&self, id: ParticipantId, message: &str);

    /// Spawn position of the first available world, if any world exists.
    async fn world_spawn(&self) -> Option<Position>;

    /// Root directory holding world data; the reset flag is created here.
    fn world_root(&self) -> PathBuf;

    /// Issues the engine's administrative shutdown command. Terminal for
    /// the process.
    async fn shutdown(&self);
}
