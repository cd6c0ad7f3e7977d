//! Progress reporting boundary between backends and the command surface.

use std::io::{self, Read};

/// A readable byte stream that must be explicitly closed.
///
/// Backends hand transfer bodies across this trait so the progress layer can
/// wrap them without caring what carries the bytes. `close` is called exactly
/// once per transfer, whether it ran to completion or was abandoned;
/// implementations surface their own close failure to the caller.
pub trait FetchStream: Read + Send {
    fn close(&mut self) -> io::Result<()>;
}

impl FetchStream for std::fs::File {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: AsRef<[u8]> + Send> FetchStream for io::Cursor<T> {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Capability for observing transfer progress.
///
/// One instance serves any number of simultaneously running transfers; each
/// `track` call yields an independent display slot, even when labels collide.
/// Implementations must be callable from concurrent transfer tasks.
pub trait ProgressTracker: Send + Sync {
    /// Wrap `stream` so that reads advance a display element for `label`.
    ///
    /// `current` seeds the position for resumed transfers. `total` is the
    /// expected byte count; `None` (or zero) renders indeterminate. The
    /// returned stream must be closed exactly once; closing finalizes the
    /// display slot regardless of how many bytes were actually consumed.
    fn track(
        &self,
        label: &str,
        current: u64,
        total: Option<u64>,
        stream: Box<dyn FetchStream>,
    ) -> Box<dyn FetchStream>;
}

/// Stand-in used when progress display is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracker;

impl ProgressTracker for NoopTracker {
    fn track(
        &self,
        _label: &str,
        _current: u64,
        _total: Option<u64>,
        stream: Box<dyn FetchStream>,
    ) -> Box<dyn FetchStream> {
        stream
    }
}
