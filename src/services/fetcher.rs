use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, DNS, timeout, or a non-2xx response.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The response arrived but its body could not be read as text.
    #[error("unreadable response body: {0}")]
    Content(String),
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Single GET of `url`. No retries; the next scheduled cycle is the retry.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("live-sports-api/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(format!("GET {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Transport(format!(
                "GET {} returned status {}",
                url, status
            )));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Content(e.to_string()))
    }
}
