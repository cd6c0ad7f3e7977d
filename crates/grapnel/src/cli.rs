//! Argument surface for the grapnel binary.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use grapnel_core::{
    Client, Getter, HttpOptions, MetaGetPolicy, Mode, Request, SymlinkPolicy,
};
use grapnel_progress::ProgressDisplay;

/// Fetch an artifact from a source locator into a destination path.
///
/// The source type (version control, network share, HTTP, local path,
/// object storage) is resolved by the registered backend getters.
#[derive(Debug, Parser)]
#[command(name = "grapnel", version, about, long_about = None)]
pub struct App {
    /// Source locator to fetch.
    pub src: String,

    /// Destination path for the fetched artifact.
    pub dst: PathBuf,

    /// What the destination is allowed to become.
    #[arg(long, value_enum, default_value = "any")]
    pub mode: ModeArg,

    /// Render live transfer progress on stderr.
    #[arg(long)]
    pub progress: bool,

    /// Refuse to materialize symlinks at the destination.
    #[arg(long)]
    pub disable_symlinks: bool,

    /// Do not read credentials from the netrc file.
    #[arg(long)]
    pub no_netrc: bool,

    /// Skip the size probe that runs before HTTP downloads.
    #[arg(long)]
    pub skip_head: bool,

    /// Read timeout for network transfers (e.g. "30s"); unset means none.
    #[arg(long, value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// Timeout for response headers on the size probe.
    #[arg(long, value_parser = humantime::parse_duration, default_value = "10s")]
    pub timeout_headers: Duration,

    /// Abort transfers larger than this many bytes.
    #[arg(long)]
    pub max_bytes: Option<u64>,

    /// Honor the meta-get header convention when a server points at the
    /// real source.
    #[arg(long)]
    pub enable_meta_get: bool,

    /// Maximum meta-get redirections to follow; 0 means unlimited.
    #[arg(long, default_value_t = 0)]
    pub meta_get_limit: usize,
}

/// clap-facing mirror of [`Mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Any,
    File,
    Dir,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Any => Mode::Any,
            ModeArg::File => Mode::File,
            ModeArg::Dir => Mode::Dir,
        }
    }
}

impl App {
    /// Build the request, wire up progress and run the fetch.
    pub async fn run(self) -> anyhow::Result<PathBuf> {
        let pwd = std::env::current_dir().context("resolving working directory")?;

        let mut req = Request::new(self.src, self.dst)
            .pwd(pwd)
            .mode(self.mode.into())
            .symlinks(if self.disable_symlinks {
                SymlinkPolicy::Deny
            } else {
                SymlinkPolicy::Follow
            });
        if self.progress {
            req = req.progress(Arc::new(ProgressDisplay::new()));
        }

        let http = HttpOptions::default()
            .netrc(!self.no_netrc)
            .read_timeout(self.timeout)
            .head_timeout(self.timeout_headers)
            .skip_head(self.skip_head)
            .max_bytes(self.max_bytes)
            .meta_get(MetaGetPolicy {
                enabled: self.enable_meta_get,
                limit: self.meta_get_limit,
            });

        let client = Client::new(getters(&http));
        let res = client.get(req).await?;
        Ok(res.dst)
    }
}

/// Backend getters in detection order.
///
/// When a source is valid for more than one getter the earliest
/// registration wins, so keep specific backends ahead of generic ones.
/// Protocol backends (version control, network share, HTTP, local
/// filesystem, object storage) live in engine crates and link in here; the
/// base build carries none.
fn getters(_http: &HttpOptions) -> Vec<Box<dyn Getter>> {
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        App::command().debug_assert();
    }

    #[test]
    fn two_positionals_and_defaults() {
        let app = App::parse_from(["grapnel", "https://example.com/a.zip", "out"]);
        assert_eq!(app.src, "https://example.com/a.zip");
        assert_eq!(app.dst, PathBuf::from("out"));
        assert_eq!(app.mode, ModeArg::Any);
        assert!(!app.progress);
        assert!(!app.disable_symlinks);
        assert!(!app.no_netrc);
        assert!(!app.skip_head);
        assert_eq!(app.timeout, None);
        assert_eq!(app.timeout_headers, Duration::from_secs(10));
        assert_eq!(app.max_bytes, None);
        assert!(!app.enable_meta_get);
        assert_eq!(app.meta_get_limit, 0);
    }

    #[test]
    fn missing_destination_is_rejected() {
        assert!(App::try_parse_from(["grapnel", "https://example.com/a.zip"]).is_err());
    }

    #[test]
    fn mode_values_parse() {
        for (value, expected) in [("any", Mode::Any), ("file", Mode::File), ("dir", Mode::Dir)] {
            let app = App::parse_from(["grapnel", "src", "dst", "--mode", value]);
            assert_eq!(Mode::from(app.mode), expected);
        }
        assert!(App::try_parse_from(["grapnel", "src", "dst", "--mode", "archive"]).is_err());
    }

    #[test]
    fn durations_parse_humanely() {
        let app = App::parse_from([
            "grapnel",
            "src",
            "dst",
            "--timeout",
            "90s",
            "--timeout-headers",
            "2s",
        ]);
        assert_eq!(app.timeout, Some(Duration::from_secs(90)));
        assert_eq!(app.timeout_headers, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn run_fails_without_a_claiming_backend() {
        let app = App::parse_from(["grapnel", "https://example.com/a.zip", "out"]);
        let err = app.run().await.unwrap_err();
        assert!(err.to_string().contains("no getter recognized source"));
    }
}
