//! Event types: the observability bus and the inbound game notices.

mod bus;
mod event;
mod notices;

pub use bus::Bus;
pub use event::{ResetEvent, ResetEventKind};
pub use notices::{DeathNotice, GameHandler, JoinNotice, RespawnNotice};
