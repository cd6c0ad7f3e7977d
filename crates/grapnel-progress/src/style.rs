//! Bar styles for tracked transfers.

use indicatif::ProgressStyle;
use once_cell::sync::Lazy;

const BAR_TEMPLATE: &str = "{spinner:.blue} {prefix:>20!.cyan.bold} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

// No percentage without a total; show what moved and how fast.
const SPINNER_TEMPLATE: &str =
    "{spinner:.blue} {prefix:>20!.cyan.bold} [{elapsed_precise}] {bytes} ({bytes_per_sec})";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const BAR_CHARS: &str = "█▓▒░  ";

static BAR_STYLE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    ProgressStyle::with_template(BAR_TEMPLATE)
        .ok()
        .map(|style| style.tick_chars(TICK).progress_chars(BAR_CHARS))
});

static SPINNER_STYLE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    ProgressStyle::with_template(SPINNER_TEMPLATE)
        .ok()
        .map(|style| style.tick_chars(TICK))
});

/// Style for a transfer with a known total.
pub(crate) fn bar() -> ProgressStyle {
    BAR_STYLE
        .as_ref()
        .cloned()
        .unwrap_or_else(ProgressStyle::default_bar)
}

/// Style for a transfer of unknown size.
pub(crate) fn spinner() -> ProgressStyle {
    SPINNER_STYLE
        .as_ref()
        .cloned()
        .unwrap_or_else(ProgressStyle::default_spinner)
}
