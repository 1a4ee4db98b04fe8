//! Errors raised at the decode boundary.
//!
//! The algebra itself is total over well-formed deltas; only turning
//! external JSON into a [`Delta`](crate::Delta) can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeltaError {
    /// The backing sequence is missing or is not an array of records.
    #[error("INVALID_OPS: {0}")]
    InvalidOps(String),
    /// A single record could not be turned into an [`Op`](crate::Op).
    #[error("INVALID_OP at {index}: {reason}")]
    InvalidOp { index: usize, reason: String },
    #[error("INVALID_JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
