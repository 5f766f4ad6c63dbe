//! Participant identity.

use std::fmt;

use uuid::Uuid;

/// Stable identifier of a connected participant.
///
/// Wraps the engine-assigned UUID. Used as the key for casualty tracking,
/// pending death messages, and respawn supervisor handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParticipantId(Uuid);

impl ParticipantId {
    /// Wraps an engine-provided UUID.
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generates a fresh random id (useful for harnesses and tests).
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for ParticipantId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}
