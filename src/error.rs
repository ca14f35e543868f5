//! Error types for hard trace failures.
//!
//! Dead ends, floating cables and unknown port shapes are not errors; they
//! end a trace with a [`Termination`](crate::budget::Termination) instead.

use thiserror::Error;

/// Result type for trace operations
pub type TraceResult<T> = Result<T, TraceError>;

/// Caller-input errors raised before any traversal happens
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraceError {
    /// Neither a box nor a point of presence has this id
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// The id resolves to a point of presence without any splitters
    #[error("Node '{0}' has no splitters and cannot be traced from")]
    NoSplitters(String),

    /// The box exists but does not contain the splitter
    #[error("Splitter '{splitter_id}' not found in box '{box_id}'")]
    SplitterNotFound { box_id: String, splitter_id: String },
}
