//! # Game notifications delivered to the coordinator.
//!
//! The host adapter translates engine callbacks (death, respawn, join) into
//! notice structs and hands them to a [`GameHandler`] mutably **before**
//! completing delivery. The handler may rewrite the outcome fields
//! ([`DeathNotice::message`], [`RespawnNotice::destination`]); it never
//! suppresses delivery.
//!
//! ## Flow
//! ```text
//! engine callback ──► adapter builds notice ──► handler.on_death(&mut n)
//!                                                    │ (may rewrite fields)
//!                     adapter completes delivery ◄───┘
//! ```

use async_trait::async_trait;

use crate::engine::{ParticipantId, Position};

/// A participant death, delivered before the death message is shown.
#[derive(Clone, Debug)]
pub struct DeathNotice {
    /// Who died.
    pub participant: ParticipantId,
    /// Display name at time of death.
    pub name: String,
    /// Where they died.
    pub position: Position,
    /// Message that will be shown once delivery completes. Handlers may
    /// replace it.
    pub message: String,
}

/// A participant respawn, delivered before the destination is applied.
#[derive(Clone, Debug)]
pub struct RespawnNotice {
    /// Who is respawning.
    pub participant: ParticipantId,
    /// Where the engine intends to place them. Handlers may replace it.
    pub destination: Position,
}

/// A participant join, delivered after the participant is connected.
#[derive(Clone, Debug)]
pub struct JoinNotice {
    /// Who joined.
    pub participant: ParticipantId,
}

/// # Subscription seam for game notifications.
///
/// Implemented by the coordinator; invoked by the host adapter for every
/// death, respawn, and join. Calls for one handler are serialized by the
/// adapter (the engine dispatches callbacks from a single logical thread).
#[async_trait]
pub trait GameHandler: Send + Sync + 'static {
    /// Handles a death. May rewrite `notice.message`.
    async fn on_death(&self, notice: &mut DeathNotice);

    /// Handles a respawn. May rewrite `notice.destination`.
    async fn on_respawn(&self, notice: &mut RespawnNotice);

    /// Handles a join.
    async fn on_join(&self, notice: &JoinNotice);
}
