//! Error types surfaced by engine primitives.
//!
//! The only fallible primitive in this crate is the forced-respawn request;
//! everything else either cannot fail or degrades silently (no error aborts
//! an armed reset cycle). [`EngineError`] classifies respawn failures into
//! retryable and terminal cases, with `as_label` for log/event output.

use thiserror::Error;

/// # Failures reported by engine primitives.
///
/// Retryable errors keep the respawn supervisor alive; terminal errors make
/// it discard itself without further attempts.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine rejected the request for now; the participant's client
    /// state does not currently support it. Safe to retry.
    #[error("engine rejected the request: {reason}")]
    Rejected {
        /// Engine-provided rejection detail.
        reason: String,
    },

    /// The operation is impossible in the current context. Never retried.
    #[error("operation unsupported in this context: {reason}")]
    Unsupported {
        /// Engine-provided detail.
        reason: String,
    },

    /// The participant disconnected before the request could be served.
    #[error("participant is no longer connected")]
    Disconnected,
}

impl EngineError {
    /// Returns a short stable label (snake_case) for use in events/logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            EngineError::Rejected { .. } => "engine_rejected",
            EngineError::Unsupported { .. } => "engine_unsupported",
            EngineError::Disconnected => "engine_disconnected",
        }
    }

    /// Indicates whether the failed request is safe to retry.
    ///
    /// Only [`EngineError::Rejected`] is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Rejected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_rejected_is_retryable() {
        let rejected = EngineError::Rejected {
            reason: "client not ready".into(),
        };
        assert!(rejected.is_retryable());

        let unsupported = EngineError::Unsupported {
            reason: "no respawn hook".into(),
        };
        assert!(!unsupported.is_retryable());
        assert!(!EngineError::Disconnected.is_retryable());
    }

    #[test]
    fn test_labels_are_stable() {
        let rejected = EngineError::Rejected { reason: "x".into() };
        assert_eq!(rejected.as_label(), "engine_rejected");
        assert_eq!(EngineError::Disconnected.as_label(), "engine_disconnected");
    }
}
