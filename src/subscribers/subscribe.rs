//! Subscriber trait for reset cycle events.

use async_trait::async_trait;

use crate::events::ResetEvent;

/// # Consumer of reset cycle events.
///
/// Implementations receive every event published on the coordinator's bus,
/// in order, one at a time. Keep handlers fast; the fan-out awaits each
/// subscriber serially and the cycle never waits for them.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use resetvisor::{ResetEvent, Subscribe};
///
/// struct Counter;
///
/// #[async_trait]
/// impl Subscribe for Counter {
///     fn name(&self) -> &str { "counter" }
///     async fn on_event(&self, _event: &ResetEvent) {
///         // count, log, alert...
///     }
/// }
/// ```
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Stable subscriber name for diagnostics.
    fn name(&self) -> &str {
        "subscriber"
    }

    /// Handles one event.
    async fn on_event(&self, event: &ResetEvent);
}
