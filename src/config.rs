//! # Reset cycle configuration.
//!
//! [`ResetConfig`] collects every fixed parameter of a reset cycle: the
//! arming delay, the observer lockdown delay, countdown length and
//! announcement checkpoints, the respawn retry cadence and budget, the
//! fallback position, the flag file name, and the event bus capacity.
//!
//! The defaults are the production constants; there is no external
//! configuration surface. The struct exists so tests can shrink timings
//! and so the fallback position is not a buried magic value.
//!
//! # Example
//! ```
//! use resetvisor::ResetConfig;
//!
//! let cfg = ResetConfig::default();
//! assert_eq!(cfg.countdown_seconds, 60);
//! assert_eq!(cfg.respawn_retry_budget, 10);
//! assert!(cfg.checkpoints.contains(&5));
//! ```

use crate::engine::Position;

/// Countdown seconds at which the remaining time is announced.
pub const DEFAULT_CHECKPOINTS: &[u32] = &[60, 50, 40, 30, 20, 10, 5, 4, 3, 2, 1];

/// Fixed parameters of the reset ritual.
#[derive(Clone, Debug)]
pub struct ResetConfig {
    /// Ticks between the triggering death and reset initiation.
    pub arm_delay_ticks: u32,
    /// Ticks between the quiet-kill sweep and the observer lockdown.
    pub observer_delay_ticks: u32,
    /// Total countdown length in seconds.
    pub countdown_seconds: u32,
    /// Remaining-second values that get a broadcast. Order does not matter;
    /// membership is all that is checked.
    pub checkpoints: Vec<u32>,
    /// Ticks before a fresh respawn supervisor runs its first attempt.
    pub respawn_initial_delay_ticks: u32,
    /// Ticks between respawn supervisor attempts.
    pub respawn_period_ticks: u32,
    /// Forced-respawn attempts before degrading to a manual prompt.
    pub respawn_retry_budget: u32,
    /// Anchor substitute when the triggering death has no usable position
    /// and no world exists to supply a spawn point.
    pub fallback_position: Position,
    /// File name of the reset flag, created under the engine's world root.
    pub flag_name: String,
    /// Capacity of the reset event bus channel.
    pub bus_capacity: usize,
}

impl Default for ResetConfig {
    /// Production constants:
    /// - `arm_delay_ticks = 60` (3 s)
    /// - `observer_delay_ticks = 20` (1 s)
    /// - `countdown_seconds = 60`, checkpoints per [`DEFAULT_CHECKPOINTS`]
    /// - respawn supervisor: first attempt after 1 tick, then every 4 ticks,
    ///   budget 10
    /// - `fallback_position = (0, 64, 0)`
    /// - `flag_name = "reset.flag"`
    fn default() -> Self {
        Self {
            arm_delay_ticks: 60,
            observer_delay_ticks: 20,
            countdown_seconds: 60,
            checkpoints: DEFAULT_CHECKPOINTS.to_vec(),
            respawn_initial_delay_ticks: 1,
            respawn_period_ticks: 4,
            respawn_retry_budget: 10,
            fallback_position: Position::new(0.0, 64.0, 0.0),
            flag_name: "reset.flag".to_string(),
            bus_capacity: 1024,
        }
    }
}
