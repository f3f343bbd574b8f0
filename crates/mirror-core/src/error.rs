//! Error types for the state mirror.

/// Errors raised while turning display state into wire frames.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    /// A wire event could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
