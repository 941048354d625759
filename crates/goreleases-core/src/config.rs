//! Fetch configuration.

use std::time::Duration;

/// Default location of release archives and the JSON catalog.
pub const DEFAULT_BASE_URL: &str = "https://go.dev/dl/";

/// Name of the directory every Go release archive is rooted at.
pub const DEFAULT_ROOT_DIR_NAME: &str = "go";

/// Configuration for fetching releases.
///
/// # Examples
///
/// ```
/// use goreleases_core::FetchConfig;
///
/// // Official download server
/// let config = FetchConfig::default();
///
/// // Mirror
/// let mirror = FetchConfig::default().with_base_url("https://mirror.example.com/golang");
/// assert_eq!(mirror.base_url, "https://mirror.example.com/golang/");
/// ```
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Base URL; release filenames and catalog queries are appended to it.
    /// Always ends with `/`.
    pub base_url: String,

    /// Name of the top-level directory the archive extracts into.
    pub root_dir_name: String,

    /// Timeout for establishing a connection.
    pub connect_timeout: Duration,

    /// Timeout for a whole request, body included. `None` means no limit.
    pub timeout: Option<Duration>,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    /// Default values:
    /// - `base_url`: `https://go.dev/dl/`
    /// - `root_dir_name`: `go`
    /// - `connect_timeout`: 30 seconds
    /// - `timeout`: none (release archives are large)
    /// - `user_agent`: `goreleases/<version>`
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            root_dir_name: DEFAULT_ROOT_DIR_NAME.to_string(),
            connect_timeout: Duration::from_secs(30),
            timeout: None,
            user_agent: concat!("goreleases/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchConfig {
    /// Replaces the base URL, adding a trailing `/` if missing.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    /// Sets a timeout for whole requests.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the URL of a file relative to the base URL.
    #[must_use]
    pub fn url_for(&self, name: &str) -> String {
        format!("{}{name}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FetchConfig::default();
        assert_eq!(config.base_url, "https://go.dev/dl/");
        assert_eq!(config.root_dir_name, "go");
        assert!(config.timeout.is_none());
        assert!(config.user_agent.starts_with("goreleases/"));
    }

    #[test]
    fn test_with_base_url_adds_slash() {
        let config = FetchConfig::default().with_base_url("http://localhost:8080/dl");
        assert_eq!(config.base_url, "http://localhost:8080/dl/");

        let config = FetchConfig::default().with_base_url("http://localhost:8080/dl/");
        assert_eq!(config.base_url, "http://localhost:8080/dl/");
    }

    #[test]
    fn test_url_for() {
        let config = FetchConfig::default();
        assert_eq!(
            config.url_for("go1.21.0.linux-amd64.tar.gz"),
            "https://go.dev/dl/go1.21.0.linux-amd64.tar.gz"
        );
        assert_eq!(config.url_for("?mode=json"), "https://go.dev/dl/?mode=json");
    }
}
