//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints reset cycle events to stdout in a human-readable
//! format.
//!
//! ## Output format
//! ```text
//! [armed] trigger=0f3c... anchor=(10.0, 64.0, 10.0)
//! [casualty] participant=7a1b... detail="Yara died during the hardcore reset."
//! [supervisor-started] participant=7a1b...
//! [supervisor-discarded] participant=7a1b... reason="exhausted" attempts=10
//! [countdown] remaining=60
//! [flag-created] path="/srv/world/reset.flag"
//! [shutdown-issued]
//! ```

use async_trait::async_trait;

use crate::events::{ResetEvent, ResetEventKind};

use super::subscribe::Subscribe;

/// Stdout logging subscriber.
///
/// Useful for development and demos; implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    fn name(&self) -> &str {
        "log_writer"
    }

    async fn on_event(&self, e: &ResetEvent) {
        match e.kind {
            ResetEventKind::Armed => {
                println!(
                    "[armed] trigger={:?} anchor={:?}",
                    e.participant, e.position
                );
            }
            ResetEventKind::CasualtyRecorded => {
                println!(
                    "[casualty] participant={:?} detail={:?}",
                    e.participant, e.detail
                );
            }
            ResetEventKind::Initiated => {
                println!("[initiated] target={:?}", e.position);
            }
            ResetEventKind::LockdownComplete => {
                println!(
                    "[lockdown-complete] target={:?} countdown={:?}s",
                    e.position, e.seconds
                );
            }
            ResetEventKind::SupervisorStarted => {
                println!("[supervisor-started] participant={:?}", e.participant);
            }
            ResetEventKind::SupervisorDiscarded => {
                println!(
                    "[supervisor-discarded] participant={:?} reason={:?} attempts={:?}",
                    e.participant, e.detail, e.attempt
                );
            }
            ResetEventKind::CountdownCheckpoint => {
                println!("[countdown] remaining={:?}", e.seconds);
            }
            ResetEventKind::FlagCreated => {
                println!("[flag-created] path={:?}", e.detail);
            }
            ResetEventKind::FlagWriteFailed => {
                println!("[flag-write-failed] err={:?}", e.detail);
            }
            ResetEventKind::ShutdownIssued => {
                println!("[shutdown-issued]");
            }
            ResetEventKind::TornDown => {
                println!("[torn-down]");
            }
        }
    }
}
