//! Network access for catalog queries and archive downloads.
//!
//! The pipeline only needs a readable byte stream per file name, so the
//! network sits behind the [`Transport`] trait. [`HttpTransport`] is the
//! production implementation; tests substitute in-memory doubles.

use std::io::Read;

use reqwest::blocking::Client;
use tracing::debug;

use crate::FetchConfig;
use crate::FetchError;
use crate::Result;

/// An opened download.
pub struct Download {
    /// Response body.
    pub body: Box<dyn Read>,

    /// Body length announced by the server, if any.
    pub content_length: Option<u64>,
}

impl Download {
    /// Wraps a reader with an unknown length.
    pub fn new(body: impl Read + 'static) -> Self {
        Self {
            body: Box::new(body),
            content_length: None,
        }
    }

    /// Wraps a reader with a known length.
    pub fn with_length(body: impl Read + 'static, content_length: u64) -> Self {
        Self {
            body: Box::new(body),
            content_length: Some(content_length),
        }
    }
}

impl std::fmt::Debug for Download {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Download")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Source of downloadable files.
pub trait Transport {
    /// Opens `name`, relative to the transport's base location.
    ///
    /// # Errors
    ///
    /// Returns a network-class [`FetchError`] if the file cannot be opened.
    fn open(&self, name: &str) -> Result<Download>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn open(&self, name: &str) -> Result<Download> {
        (**self).open(name)
    }
}

/// HTTP transport using a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: FetchConfig,
}

impl HttpTransport {
    /// Creates a transport from the given configuration.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|source| FetchError::Request {
                url: config.base_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Returns the base URL names are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

impl Transport for HttpTransport {
    fn open(&self, name: &str) -> Result<Download> {
        let url = self.config.url_for(name);
        debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let content_length = response.content_length();
        debug!(%url, ?content_length, "response body ready");
        Ok(Download {
            body: Box::new(response),
            content_length,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct StaticTransport(&'static [u8]);

    impl Transport for StaticTransport {
        fn open(&self, _name: &str) -> Result<Download> {
            Ok(Download::with_length(Cursor::new(self.0), self.0.len() as u64))
        }
    }

    #[test]
    fn test_transport_by_reference() {
        let transport = StaticTransport(b"payload");
        let by_ref = &transport;
        let mut download = by_ref.open("anything").unwrap();
        assert_eq!(download.content_length, Some(7));

        let mut body = String::new();
        download.body.read_to_string(&mut body).unwrap();
        assert_eq!(body, "payload");
    }

    #[test]
    fn test_http_transport_keeps_base_url() {
        let config = FetchConfig::default().with_base_url("http://127.0.0.1:9/dl");
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.base_url(), "http://127.0.0.1:9/dl/");
    }

    #[test]
    fn test_http_transport_connection_refused_is_network_error() {
        // Port 9 (discard) is closed on test machines.
        let config = FetchConfig::default().with_base_url("http://127.0.0.1:9/dl");
        let transport = HttpTransport::new(&config).unwrap();
        let err = transport.open("go1.21.0.linux-amd64.tar.gz").unwrap_err();
        assert_eq!(err.class(), crate::ErrorClass::Network);
        match err {
            FetchError::Request { url, .. } => {
                assert_eq!(url, config.url_for("go1.21.0.linux-amd64.tar.gz"));
            }
            other => panic!("expected request error, got {other}"),
        }
    }
}
