//! Shared progress surface for concurrent transfers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget};

use grapnel_core::{FetchStream, ProgressTracker};

use crate::reader::TrackedReader;
use crate::style;

const DRAW_HZ: u8 = 20;
const STEADY_TICK: Duration = Duration::from_millis(100);

/// Multiplexes any number of concurrent transfers onto one display surface.
///
/// The surface (an [`indicatif::MultiProgress`]) exists only while at least
/// one tracked stream is open: the first [`track_stream`] call starts it,
/// the last close tears it down. Handles are cheap to clone and share one
/// pool; construct one per invocation and hand it to whatever issues
/// transfers rather than reaching for a process-wide instance.
///
/// [`track_stream`]: ProgressDisplay::track_stream
#[derive(Clone)]
pub struct ProgressDisplay {
    shared: Arc<Shared>,
}

struct Shared {
    hidden: bool,
    state: Mutex<PoolState>,
}

#[derive(Default)]
struct PoolState {
    /// Live surface; present iff `active > 0`.
    pool: Option<MultiProgress>,
    /// Open tracked streams against the pool.
    active: usize,
}

impl ProgressDisplay {
    /// A display that renders on stderr.
    pub fn new() -> Self {
        Self::with_hidden(false)
    }

    /// A display whose bars never draw.
    ///
    /// Bookkeeping behaves exactly as with [`new`](ProgressDisplay::new);
    /// used where no terminal is available.
    pub fn hidden() -> Self {
        Self::with_hidden(true)
    }

    fn with_hidden(hidden: bool) -> Self {
        Self {
            shared: Arc::new(Shared {
                hidden,
                state: Mutex::new(PoolState::default()),
            }),
        }
    }

    /// Start tracking one transfer and wrap its byte stream.
    ///
    /// Every call yields an independent bar, even for duplicate labels.
    /// A `total` of `None` or zero renders indeterminate. The returned
    /// reader must be closed once the transfer completes or is abandoned;
    /// closing releases its bar, and the last close releases the surface
    /// itself.
    pub fn track_stream(
        &self,
        label: &str,
        current: u64,
        total: Option<u64>,
        stream: Box<dyn FetchStream>,
    ) -> TrackedReader {
        let bar = {
            let mut state = self.state();
            let pool = match &state.pool {
                Some(pool) => pool.clone(),
                None => {
                    let pool = self.new_pool();
                    state.pool = Some(pool.clone());
                    pool
                }
            };
            let bar = pool.add(new_bar(label, current, total));
            bar.enable_steady_tick(STEADY_TICK);
            state.active += 1;
            bar
        };
        TrackedReader::new(stream, bar, self.clone())
    }

    /// Finalize one bar and release the pool when it was the last.
    ///
    /// Runs unconditionally on close, however little of the stream was
    /// consumed, and never fails: rendering is observability, not part of
    /// the transfer outcome.
    pub(crate) fn finish_stream(&self, bar: &ProgressBar) {
        let mut state = self.state();
        // Force the completed state so an abandoned transfer does not
        // linger as stalled.
        if let Some(len) = bar.length() {
            bar.set_position(len);
        }
        bar.finish_and_clear();
        if let Some(pool) = &state.pool {
            pool.remove(bar);
        }
        debug_assert!(state.active > 0, "finalize without a matching track");
        state.active = state.active.saturating_sub(1);
        if state.active == 0 {
            // Dropping the surface stops its draw state.
            state.pool = None;
        }
    }

    /// Number of currently open tracked streams.
    pub fn active(&self) -> usize {
        self.state().active
    }

    /// Whether the shared surface has been released (no open streams).
    pub fn is_idle(&self) -> bool {
        self.state().pool.is_none()
    }

    fn state(&self) -> MutexGuard<'_, PoolState> {
        // A panicked transfer task must not take the display down with it;
        // the remaining transfers still need their bookkeeping.
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn new_pool(&self) -> MultiProgress {
        let pool = MultiProgress::new();
        pool.set_draw_target(if self.shared.hidden {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stderr_with_hz(DRAW_HZ)
        });
        pool
    }
}

impl Default for ProgressDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker for ProgressDisplay {
    fn track(
        &self,
        label: &str,
        current: u64,
        total: Option<u64>,
        stream: Box<dyn FetchStream>,
    ) -> Box<dyn FetchStream> {
        Box::new(self.track_stream(label, current, total, stream))
    }
}

fn new_bar(label: &str, current: u64, total: Option<u64>) -> ProgressBar {
    let bar = match total {
        Some(len) if len > 0 => ProgressBar::new(len).with_style(style::bar()),
        // Zero and unknown totals both render indeterminate.
        _ => ProgressBar::new_spinner().with_style(style::spinner()),
    };
    bar.set_prefix(label.to_owned());
    if current > 0 {
        bar.set_position(current);
    }
    bar
}
