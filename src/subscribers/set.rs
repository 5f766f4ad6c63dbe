//! # Subscriber fan-out.
//!
//! [`SubscriberSet`] holds the registered subscribers and forwards each bus
//! event to all of them, serially, from one spawned listener task.
//!
//! ```text
//! Bus ──► listener task ──► sub1.on_event ──► sub2.on_event ──► ...
//! ```
//!
//! A lagging listener skips the dropped events and keeps going; the reset
//! cycle itself never depends on event delivery.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use crate::core::TaskHandle;
use crate::events::{Bus, ResetEvent};

use super::subscribe::Subscribe;

/// Ordered set of subscribers sharing one bus listener.
pub struct SubscriberSet {
    subs: Vec<Arc<dyn Subscribe>>,
}

impl SubscriberSet {
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Arc<Self> {
        Arc::new(Self { subs })
    }

    /// Delivers one event to every subscriber, in registration order.
    pub async fn emit(&self, event: &ResetEvent) {
        for sub in &self.subs {
            sub.on_event(event).await;
        }
    }

    /// Spawns the listener task forwarding bus events into this set.
    ///
    /// Returns a handle; cancel it to stop listening. Events published
    /// before this call are not observed.
    pub fn spawn_listener(self: Arc<Self>, bus: &Bus) -> TaskHandle {
        let mut rx = bus.subscribe();
        let token = CancellationToken::new();
        let t = token.clone();

        crate::core::spawn_with_token(token, async move {
            loop {
                tokio::select! {
                    _ = t.cancelled() => break,
                    msg = rx.recv() => match msg {
                        Ok(ev) => self.emit(&ev).await,
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(_)) => continue,
                    }
                }
            }
        })
    }
}
