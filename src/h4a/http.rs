use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::error::{H4aError, Result};


const USER_AGENT: &str = concat!("h4a-sync/", env!("CARGO_PKG_VERSION"));

/// Capability to GET a URL and decode the body as JSON.
///
/// Transport failures (connection, timeout, non-2xx) must surface as
/// `H4aError::Http` or `H4aError::Fetch`, see [`H4aError::is_transport`].
/// No retries happen at this layer.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn fetch_json(&self, url: &str) -> Result<Value>;
}

/// [`JsonFetcher`] backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JsonFetcher for ReqwestFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        tracing::debug!(url, "GET");

        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        // A body that is not JSON came through the transport fine; it is an
        // upstream contract break.
        serde_json::from_slice(&body).map_err(|e| {
            H4aError::malformed(format!("response from {} is not JSON: {}", url, e))
        })
    }
}
