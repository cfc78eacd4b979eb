//! HTTPS target client

use crate::config::TlsPaths;
use crate::error::LoadResult;
use crate::tls::TlsCredentials;
use crate::traits::{RequestError, TargetClient};

use async_trait::async_trait;

/// Sends GET requests to one target over a shared mutual-TLS transport
///
/// Clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpsTargetClient {
    client: reqwest::Client,
    target: String,
}

impl HttpsTargetClient {
    /// Wrap an already configured client
    pub fn new(client: reqwest::Client, target: impl Into<String>) -> Self {
        Self {
            client,
            target: target.into(),
        }
    }

    /// Load credentials from `paths` and build the client
    ///
    /// # Errors
    /// Any credential or TLS construction failure; these are fatal at startup.
    pub fn from_paths(
        paths: &TlsPaths,
        target: impl Into<String>,
        pool_size: usize,
    ) -> LoadResult<Self> {
        let credentials = TlsCredentials::load(paths)?;
        let client = credentials.build_client(pool_size)?;
        Ok(Self::new(client, target))
    }
}

#[async_trait]
impl TargetClient for HttpsTargetClient {
    fn target(&self) -> &str {
        &self.target
    }

    async fn get(&self) -> Result<u16, RequestError> {
        let response = self.client.get(&self.target).send().await?;
        let status = response.status().as_u16();

        // Read the body to the end so the connection returns to the pool;
        // on error the response is dropped and the connection with it.
        response.bytes().await?;

        Ok(status)
    }
}
