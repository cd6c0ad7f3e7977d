//! Backend capability trait.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::GetError;
use crate::request::Request;

/// A retrieval backend for one family of source locators.
///
/// Getters are registered with a [`Client`](crate::Client) in detection
/// order. For every concrete transfer a getter performs, it routes the body
/// through [`Request::track`] and closes the returned stream exactly once,
/// whether the transfer finishes or is abandoned.
#[async_trait]
pub trait Getter: Send + Sync {
    /// Whether this getter claims `src`.
    fn detect(&self, src: &str) -> bool;

    /// Retrieve the source into the request's destination.
    ///
    /// Returns the resolved destination path.
    async fn get(&self, req: &Request) -> Result<PathBuf, GetError>;
}
