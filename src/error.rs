//! Engine error taxonomy.
//!
//! Almost everything degrades and reports partial results instead of
//! erroring; the variants here cover the few hard failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Impact analysis was asked about a node id that is not in the graph.
    /// This is a caller-contract violation and aborts rather than degrades.
    #[error("unknown target node id: {0}")]
    UnknownTarget(String),

    /// Project root missing or unreadable before any analysis could start.
    #[error("project root {path}: {source}")]
    RootUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
