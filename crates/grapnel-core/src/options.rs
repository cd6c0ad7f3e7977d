//! Transport configuration consumed by HTTP-capable backends.

use std::time::Duration;

/// Policy for the meta-get convention, where a response header names the
/// real source a server wants the client to fetch instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetaGetPolicy {
    pub enabled: bool,
    /// Maximum redirections to follow; 0 means unlimited.
    pub limit: usize,
}

impl Default for MetaGetPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            limit: 0,
        }
    }
}

/// Options for HTTP(S) retrieval.
///
/// Built by the command surface and handed to whatever HTTP-capable getters
/// are registered; backends that do not speak HTTP ignore it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpOptions {
    /// Read credentials from the netrc file.
    pub netrc: bool,

    /// Read timeout for the response body; `None` means no limit.
    pub read_timeout: Option<Duration>,

    /// Timeout for the size-probing request that runs before the download.
    ///
    /// Default: 10 seconds.
    pub head_timeout: Duration,

    /// Skip the size probe entirely and download without a known total.
    pub skip_head: bool,

    /// Abort transfers whose body grows past this many bytes.
    pub max_bytes: Option<u64>,

    pub meta_get: MetaGetPolicy,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            netrc: true,
            read_timeout: None,
            head_timeout: Duration::from_secs(10),
            skip_head: false,
            max_bytes: None,
            meta_get: MetaGetPolicy::default(),
        }
    }
}

impl HttpOptions {
    #[must_use]
    pub fn netrc(mut self, netrc: bool) -> Self {
        self.netrc = netrc;
        self
    }

    #[must_use]
    pub fn read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    #[must_use]
    pub fn head_timeout(mut self, timeout: Duration) -> Self {
        self.head_timeout = timeout;
        self
    }

    #[must_use]
    pub fn skip_head(mut self, skip: bool) -> Self {
        self.skip_head = skip;
        self
    }

    #[must_use]
    pub fn max_bytes(mut self, limit: Option<u64>) -> Self {
        self.max_bytes = limit;
        self
    }

    #[must_use]
    pub fn meta_get(mut self, policy: MetaGetPolicy) -> Self {
        self.meta_get = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_surface() {
        let options = HttpOptions::default();
        assert!(options.netrc);
        assert_eq!(options.read_timeout, None);
        assert_eq!(options.head_timeout, Duration::from_secs(10));
        assert!(!options.skip_head);
        assert_eq!(options.max_bytes, None);
        assert!(!options.meta_get.enabled);
        assert_eq!(options.meta_get.limit, 0);
    }

    #[test]
    fn builders_replace_fields() {
        let options = HttpOptions::default()
            .netrc(false)
            .read_timeout(Some(Duration::from_secs(30)))
            .skip_head(true)
            .max_bytes(Some(1 << 20))
            .meta_get(MetaGetPolicy {
                enabled: true,
                limit: 3,
            });
        assert!(!options.netrc);
        assert_eq!(options.read_timeout, Some(Duration::from_secs(30)));
        assert!(options.skip_head);
        assert_eq!(options.max_bytes, Some(1 << 20));
        assert!(options.meta_get.enabled);
        assert_eq!(options.meta_get.limit, 3);
    }
}
