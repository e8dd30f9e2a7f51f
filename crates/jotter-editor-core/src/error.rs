//! Error types for the editor core.
//!
//! Failures are handled at the boundary where they occur and never reach
//! the orchestrator's mutation path: a rejected import or upload leaves
//! the block list and history exactly as they were.

use jotter_blocks::BlockId;
use thiserror::Error;

/// Errors surfaced to the host shell (typically as a blocking alert).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("unsupported file type: {0} (expected .md or .markdown)")]
    UnsupportedFile(String),

    #[error("file is empty")]
    EmptyFile,

    #[error("file is not valid UTF-8 text")]
    InvalidEncoding,

    #[error("unknown block: {0}")]
    UnknownBlock(BlockId),

    #[error("image upload failed: {0}")]
    Upload(String),
}

/// Error reported by a persistence or upload collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct StoreError(pub String);
