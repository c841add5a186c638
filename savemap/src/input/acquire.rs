//! Reading the complete input buffer.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::remote::RemoteFetcher;
use super::{AnalysisInput, InputError};

/// A fully read input.
#[derive(Debug, Clone)]
pub struct AcquiredInput {
    /// File name the save came with, used for extension-based detection.
    pub name: Option<String>,
    pub data: Bytes,
}

impl AcquiredInput {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Reads [`AnalysisInput`]s into memory, enforcing the size limit.
pub struct InputAcquirer {
    max_bytes: u64,
    remote: Option<Arc<dyn RemoteFetcher>>,
}

impl InputAcquirer {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            remote: None,
        }
    }

    /// Enable remote inputs.
    pub fn with_remote(mut self, fetcher: Arc<dyn RemoteFetcher>) -> Self {
        self.remote = Some(fetcher);
        self
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Read `input` completely.
    ///
    /// Cancelling `cancel` aborts the read with [`InputError::Cancelled`].
    pub async fn acquire(
        &self,
        input: AnalysisInput,
        cancel: &CancellationToken,
    ) -> Result<AcquiredInput, InputError> {
        let acquired = tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                info!(input = %input.describe(), "Input acquisition cancelled");
                return Err(InputError::Cancelled);
            }

            result = self.read(input.clone()) => result?,
        };

        self.check_size(acquired.data.len() as u64)?;
        debug!(
            input = %input.describe(),
            bytes = acquired.data.len(),
            "Input acquired"
        );
        Ok(acquired)
    }

    async fn read(&self, input: AnalysisInput) -> Result<AcquiredInput, InputError> {
        match input {
            AnalysisInput::File(path) => self.read_file(&path).await,
            AnalysisInput::Bytes { name, data } => Ok(AcquiredInput { name, data }),
            AnalysisInput::Remote { url, name } => {
                let fetcher = self.remote.as_ref().ok_or(InputError::RemoteUnsupported)?;
                let data = fetcher.fetch(&url, self.max_bytes).await?;
                let name = name.or_else(|| file_name_from_url(&url));
                Ok(AcquiredInput { name, data })
            }
        }
    }

    async fn read_file(&self, path: &Path) -> Result<AcquiredInput, InputError> {
        let unreadable = |e: std::io::Error| InputError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        // Check the size before pulling a huge file into memory.
        let metadata = tokio::fs::metadata(path).await.map_err(unreadable)?;
        self.check_size(metadata.len())?;

        let data = tokio::fs::read(path).await.map_err(unreadable)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());

        Ok(AcquiredInput {
            name,
            data: Bytes::from(data),
        })
    }

    fn check_size(&self, size: u64) -> Result<(), InputError> {
        if size == 0 {
            return Err(InputError::Empty);
        }
        if size > self.max_bytes {
            return Err(InputError::Oversized {
                size,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

/// Last path segment of a URL, without query or fragment.
fn file_name_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next()?;
    let name = path.rsplit('/').next()?;
    if name.is_empty() || !name.contains('.') {
        return None;
    }
    Some(name.to_string())
}
