//! Byte-stream adapter that reports read positions to a progress bar.

use std::io::{self, Read};

use indicatif::ProgressBar;

use grapnel_core::FetchStream;

use crate::display::ProgressDisplay;

/// Pass-through reader bound to one progress bar.
///
/// Reads are forwarded to the underlying stream unchanged; the bar advances
/// by exactly the bytes handed back to the caller, so the display never runs
/// ahead of the transfer. Closing the reader finalizes its bar and
/// decrements the display's active count *before* the underlying stream is
/// closed, so a failing close cannot skip the bookkeeping. A reader dropped
/// without an explicit close finalizes the same way; the shared surface
/// cannot outlive its transfers.
pub struct TrackedReader {
    inner: Box<dyn FetchStream>,
    bar: ProgressBar,
    display: ProgressDisplay,
    finished: bool,
}

impl TrackedReader {
    pub(crate) fn new(
        inner: Box<dyn FetchStream>,
        bar: ProgressBar,
        display: ProgressDisplay,
    ) -> Self {
        Self {
            inner,
            bar,
            display,
            finished: false,
        }
    }

    /// Bytes reported so far for this transfer.
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    fn finalize(&mut self) {
        self.finished = true;
        self.display.finish_stream(&self.bar);
    }
}

impl Read for TrackedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            // Each bar has exactly one writer, so read-modify-write is
            // safe; the clamp keeps the position inside a declared total.
            match self.bar.length() {
                Some(len) => self
                    .bar
                    .set_position((self.bar.position() + n as u64).min(len)),
                None => self.bar.inc(n as u64),
            }
        }
        Ok(n)
    }
}

impl FetchStream for TrackedReader {
    /// Finalize bookkeeping, then close the underlying stream.
    ///
    /// Closing twice is a usage violation: the second call is rejected with
    /// an error and leaves the active count untouched.
    fn close(&mut self) -> io::Result<()> {
        if self.finished {
            return Err(io::Error::other("tracked stream closed twice"));
        }
        self.finalize();
        self.inner.close()
    }
}

impl Drop for TrackedReader {
    fn drop(&mut self) {
        if !self.finished {
            self.finalize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Stream whose close always fails.
    struct FailingClose(Cursor<Vec<u8>>);

    impl Read for FailingClose {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.0.read(buf)
        }
    }

    impl FetchStream for FailingClose {
        fn close(&mut self) -> io::Result<()> {
            Err(io::Error::other("close failed"))
        }
    }

    fn tracked(
        display: &ProgressDisplay,
        total: Option<u64>,
        payload: &[u8],
    ) -> TrackedReader {
        display.track_stream("a.zip", 0, total, Box::new(Cursor::new(payload.to_vec())))
    }

    #[test]
    fn position_advances_by_exactly_the_bytes_read() {
        let display = ProgressDisplay::hidden();
        let mut reader = tracked(&display, Some(10), &[7u8; 10]);

        let mut buf = [0u8; 3];
        let mut seen = 0u64;
        loop {
            let n = reader.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            seen += n as u64;
            assert_eq!(reader.position(), seen);
        }
        assert_eq!(seen, 10);
        reader.close().unwrap();
    }

    #[test]
    fn chunk_size_does_not_change_the_reported_total() {
        let payload = vec![42u8; 64];
        for chunk in [1usize, 7, 64, 128] {
            let display = ProgressDisplay::hidden();
            let mut reader = tracked(&display, Some(64), &payload);
            let mut buf = vec![0u8; chunk];
            while reader.read(&mut buf).unwrap() > 0 {}
            assert_eq!(reader.position(), 64);
            reader.close().unwrap();
        }
    }

    #[test]
    fn position_is_clamped_to_a_declared_total() {
        // The stream carries more bytes than the declared total.
        let display = ProgressDisplay::hidden();
        let mut reader = tracked(&display, Some(4), &[1u8; 16]);

        let mut sink = Vec::new();
        reader.read_to_end(&mut sink).unwrap();
        // The caller still sees every byte; only the display is clamped.
        assert_eq!(sink.len(), 16);
        assert_eq!(reader.position(), 4);
        reader.close().unwrap();
    }

    #[test]
    fn resumed_transfers_seed_the_position() {
        let display = ProgressDisplay::hidden();
        let mut reader =
            display.track_stream("a.zip", 6, Some(10), Box::new(Cursor::new(vec![0u8; 4])));
        assert_eq!(reader.position(), 6);

        let mut sink = Vec::new();
        reader.read_to_end(&mut sink).unwrap();
        assert_eq!(reader.position(), 10);
        reader.close().unwrap();
    }

    #[test]
    fn unknown_and_zero_totals_track_indeterminately() {
        for total in [None, Some(0)] {
            let display = ProgressDisplay::hidden();
            let mut reader = tracked(&display, total, &[9u8; 100]);
            let mut sink = Vec::new();
            reader.read_to_end(&mut sink).unwrap();
            // No declared length to clamp against; the raw count shows.
            assert_eq!(reader.position(), 100);
            reader.close().unwrap();
            assert!(display.is_idle());
        }
    }

    #[test]
    fn close_runs_bookkeeping_before_surfacing_the_close_failure() {
        let display = ProgressDisplay::hidden();
        let mut reader = display.track_stream(
            "a.zip",
            0,
            Some(4),
            Box::new(FailingClose(Cursor::new(vec![0u8; 4]))),
        );
        assert_eq!(display.active(), 1);

        let err = reader.close().unwrap_err();
        assert_eq!(err.to_string(), "close failed");
        // The failure did not skip the teardown.
        assert_eq!(display.active(), 0);
        assert!(display.is_idle());
    }

    #[test]
    fn double_close_is_rejected_without_touching_the_count() {
        let display = ProgressDisplay::hidden();
        let mut reader = tracked(&display, Some(4), &[0u8; 4]);

        reader.close().unwrap();
        assert_eq!(display.active(), 0);

        let err = reader.close().unwrap_err();
        assert_eq!(err.to_string(), "tracked stream closed twice");
        assert_eq!(display.active(), 0);
        assert!(display.is_idle());
    }

    #[test]
    fn dropping_an_unclosed_reader_still_finalizes() {
        let display = ProgressDisplay::hidden();
        {
            let mut reader = tracked(&display, Some(8), &[0u8; 8]);
            let mut buf = [0u8; 4];
            reader.read(&mut buf).unwrap();
            assert_eq!(display.active(), 1);
            // Dropped half-read, as after a cancelled transfer.
        }
        assert_eq!(display.active(), 0);
        assert!(display.is_idle());
    }
}
