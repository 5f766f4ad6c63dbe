//! Core runtime: scheduler, cycle state, the state machines, and the
//! coordinator that wires them together.

mod coordinator;
mod countdown;
mod respawn;
mod scheduler;
mod signal;
mod state;

pub use coordinator::{Coordinator, ResetSnapshot};
pub use scheduler::{
    schedule_once, schedule_repeating, schedule_repeating_with, spawn_with_token, ticks,
    PeriodicTask, TaskHandle, TICK, TICKS_PER_SECOND,
};
