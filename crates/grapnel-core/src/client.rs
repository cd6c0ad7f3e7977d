//! Dispatch from a source locator to the backend that claims it.

use std::path::PathBuf;

use tracing::debug;

use crate::error::GetError;
use crate::getter::Getter;
use crate::request::Request;

/// Outcome of a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetResult {
    /// Resolved destination path reported by the backend.
    pub dst: PathBuf,
}

/// Thin orchestrator over registered [`Getter`]s.
///
/// Detection runs in registration order; when a source is valid for more
/// than one getter, the earlier registration wins, so keep specific
/// backends ahead of generic ones.
pub struct Client {
    getters: Vec<Box<dyn Getter>>,
}

impl Client {
    pub fn new(getters: Vec<Box<dyn Getter>>) -> Self {
        Self { getters }
    }

    /// Fetch `req.src` into `req.dst`.
    ///
    /// Backend errors are returned unchanged; this layer only validates the
    /// request and selects the backend.
    pub async fn get(&self, req: Request) -> Result<GetResult, GetError> {
        req.validate()?;

        let getter = self
            .getters
            .iter()
            .find(|g| g.detect(&req.src))
            .ok_or_else(|| GetError::UnknownSource {
                src: req.src.clone(),
            })?;

        debug!(src = %req.src, dst = %req.dst.display(), mode = %req.mode, "dispatching fetch");
        let dst = getter.get(&req).await?;
        debug!(dst = %dst.display(), "fetch complete");

        Ok(GetResult { dst })
    }
}
