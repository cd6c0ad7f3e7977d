//! Error types for grapnel-core.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Opaque error raised inside a retrieval backend.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum GetError {
    /// The request failed validation before any transfer began.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No registered getter claimed the source locator.
    #[error("no getter recognized source {src:?}")]
    UnknownSource { src: String },

    /// A backend refused to materialize a symlink under
    /// [`SymlinkPolicy::Deny`](crate::SymlinkPolicy::Deny).
    #[error("symlinks are disabled, refusing {}", path.display())]
    SymlinksDenied { path: PathBuf },

    /// A transfer grew past the configured byte limit.
    #[error("transfer exceeds the {limit} byte limit")]
    SizeLimit { limit: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Backend failure, propagated unchanged.
    #[error(transparent)]
    Backend(#[from] BackendError),
}
