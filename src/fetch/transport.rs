//! HTTP transport seam

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;

use crate::config::FetchConfig;
use crate::error::{Result, ScoutError};

/// Issues one GET and hands back the response body.
///
/// The status code is not part of the contract: registry
/// answers are classified from the body alone.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<String>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn get(&self, url: &str) -> Result<String> {
        (**self).get(url).await
    }
}

/// reqwest-backed transport sharing one connection pool across all requests
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a client sized for `config.concurrency` simultaneous requests
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            // Keep at least one idle connection per slot so the pool never
            // throttles below the gate.
            .pool_max_idle_per_host(config.concurrency.max(1))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| ScoutError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/rdap+json, application/json")
            .send()
            .await?;

        tracing::trace!(url = %url, status = response.status().as_u16(), "RDAP response received");

        Ok(response.text().await?)
    }
}
