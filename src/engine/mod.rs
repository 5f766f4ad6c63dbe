//! Engine-facing types: the primitive seam, participant identity, and
//! world coordinates.

mod engine;
mod participant;
mod position;

pub use engine::{Engine, GameMode};
pub use participant::ParticipantId;
pub use position::Position;
