use crate::config::HarvestConfig;
use crate::network::errors::NetworkError;
use crate::network::identity::IdentityProfile;
use crate::network::Fetcher;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

// * The HTTP engine behind every page fetch and document download.
pub struct PageClient {
    inner: Client,
}

impl PageClient {
    // * Initializes the client with the static identity and a request timeout.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, NetworkError> {
        let mut headers = HeaderMap::new();
        IdentityProfile::with_user_agent(user_agent)
            .apply_to_headers(&mut headers)
            .map_err(|_| NetworkError::InvalidHeader(user_agent.to_string()))?;

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { inner: client })
    }

    pub fn from_config(config: &HarvestConfig) -> Result<Self, NetworkError> {
        Self::new(&config.user_agent, config.timeout)
    }

    async fn get_checked(&self, url: &str) -> Result<reqwest::Response, NetworkError> {
        let parsed = url::Url::parse(url).map_err(|_| NetworkError::InvalidUrl(url.to_string()))?;
        let resp = self.inner.get(parsed).send().await?;
        let status = resp.status();

        if !status.is_success() {
            return Err(NetworkError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(resp)
    }
}

#[async_trait]
impl Fetcher for PageClient {
    // * Fetches a page and returns its body as text.
    async fn fetch_page(&self, url: &str) -> Result<String, NetworkError> {
        let resp = self.get_checked(url).await?;
        let body = resp.text().await?;
        debug!(url, bytes = body.len(), "Fetched page");
        Ok(body)
    }

    // * Streams a remote body into `dest` chunk by chunk.
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, NetworkError> {
        let resp = self.get_checked(url).await?;
        let mut file = File::create(dest).await?;
        let mut stream = resp.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        file.flush().await?;
        Ok(written)
    }
}
