//! Remote save downloads.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use tracing::{debug, warn};

use super::InputError;

/// Downloads a remote save.
pub trait RemoteFetcher: Send + Sync {
    /// Fetch `url`, failing with [`InputError::Oversized`] past `max_bytes`.
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        max_bytes: u64,
    ) -> Pin<Box<dyn Future<Output = Result<Bytes, InputError>> + Send + 'a>>;
}

const USER_AGENT: &str = concat!("savemap/", env!("CARGO_PKG_VERSION"));

/// [`RemoteFetcher`] backed by an async reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    /// Create a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, InputError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| InputError::Remote {
                url: String::new(),
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }

    async fn download(&self, url: &str, max_bytes: u64) -> Result<Bytes, InputError> {
        let remote_err = |message: String| InputError::Remote {
            url: url.to_string(),
            message,
        };

        let mut response = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_timeout = e.is_timeout(),
                    "Save download failed"
                );
                return Err(remote_err(format!("request failed: {}", e)));
            }
        };

        if !response.status().is_success() {
            warn!(url = url, status = response.status().as_u16(), "HTTP error status");
            return Err(remote_err(format!("HTTP {}", response.status())));
        }

        // Reject early when the server declares the size.
        if let Some(size) = response.content_length() {
            if size > max_bytes {
                return Err(InputError::Oversized {
                    size,
                    limit: max_bytes,
                });
            }
        }

        // Servers may omit or understate the length; count as chunks arrive
        // and drop the connection once the limit is crossed.
        let capacity = response.content_length().unwrap_or(0) as usize;
        let mut body = BytesMut::with_capacity(capacity);
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| remote_err(format!("failed to read response: {}", e)))?
        {
            let size = (body.len() + chunk.len()) as u64;
            if size > max_bytes {
                warn!(
                    url = url,
                    received = size,
                    limit = max_bytes,
                    "Remote save exceeds size limit"
                );
                return Err(InputError::Oversized {
                    size,
                    limit: max_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }

        let size = body.len() as u64;
        debug!(url = url, bytes = size, "Save downloaded");
        Ok(body.freeze())
    }
}

impl RemoteFetcher for ReqwestFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        max_bytes: u64,
    ) -> Pin<Box<dyn Future<Output = Result<Bytes, InputError>> + Send + 'a>> {
        Box::pin(self.download(url, max_bytes))
    }
}
