//! The fetch request model.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::GetError;
use crate::progress::{FetchStream, ProgressTracker};

/// What the destination is allowed to become.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Let the getter decide between file and directory.
    #[default]
    Any,
    /// The source must resolve to a single file.
    File,
    /// The source must resolve to a directory.
    Dir,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Any => write!(f, "any"),
            Mode::File => write!(f, "file"),
            Mode::Dir => write!(f, "dir"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(Mode::Any),
            "file" => Ok(Mode::File),
            "dir" => Ok(Mode::Dir),
            other => Err(format!(
                "{other:?} is not a valid mode, need one of any, file, dir"
            )),
        }
    }
}

/// Whether backends may materialize symlinks at the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymlinkPolicy {
    #[default]
    Follow,
    Deny,
}

/// A single fetch: where to read from, where to place the result, and how.
///
/// Built by the command surface, handed to [`Client::get`](crate::Client::get)
/// and seen read-only by backends.
pub struct Request {
    /// Source locator.
    pub src: String,
    /// Destination path.
    pub dst: PathBuf,
    /// Working directory for resolving relative locators.
    pub pwd: PathBuf,
    pub mode: Mode,
    pub symlinks: SymlinkPolicy,
    /// Progress capability; absent when display is off.
    pub progress: Option<Arc<dyn ProgressTracker>>,
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("src", &self.src)
            .field("dst", &self.dst)
            .field("pwd", &self.pwd)
            .field("mode", &self.mode)
            .field("symlinks", &self.symlinks)
            .field("progress", &self.progress.as_ref().map(|_| "{ ... }"))
            .finish()
    }
}

impl Request {
    pub fn new(src: impl Into<String>, dst: impl Into<PathBuf>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            pwd: PathBuf::new(),
            mode: Mode::default(),
            symlinks: SymlinkPolicy::default(),
            progress: None,
        }
    }

    #[must_use]
    pub fn pwd(mut self, pwd: impl Into<PathBuf>) -> Self {
        self.pwd = pwd.into();
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn symlinks(mut self, policy: SymlinkPolicy) -> Self {
        self.symlinks = policy;
        self
    }

    #[must_use]
    pub fn progress(mut self, tracker: Arc<dyn ProgressTracker>) -> Self {
        self.progress = Some(tracker);
        self
    }

    /// Route a transfer body through the progress capability, if any.
    ///
    /// Backends call this once per concrete transfer and must close the
    /// returned stream exactly once, whether the transfer completes or is
    /// abandoned.
    pub fn track(
        &self,
        label: &str,
        current: u64,
        total: Option<u64>,
        stream: Box<dyn FetchStream>,
    ) -> Box<dyn FetchStream> {
        match &self.progress {
            Some(tracker) => tracker.track(label, current, total, stream),
            None => stream,
        }
    }

    /// Reject requests that cannot name a source or a destination.
    pub fn validate(&self) -> Result<(), GetError> {
        if self.src.is_empty() {
            return Err(GetError::InvalidRequest("source locator is empty".into()));
        }
        if self.dst.as_os_str().is_empty() {
            return Err(GetError::InvalidRequest("destination path is empty".into()));
        }
        Ok(())
    }
}
