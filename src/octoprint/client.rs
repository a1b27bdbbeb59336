use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::config::OctoPrintConfig;
use crate::error::TransportError;

/// HTTP seam to the printer host. Every request the enclosure client makes
/// goes through this trait, so tests can substitute a recording fake.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value, TransportError>;
    async fn patch(&self, path: &str, body: Value) -> Result<(), TransportError>;
    async fn post(&self, path: &str, body: Value) -> Result<(), TransportError>;
}

/// Transport for an OctoPrint-compatible host. Paths are relative to the
/// configured base URL; the API key rides along as `X-Api-Key`.
pub struct OctoPrintClient {
    base_url: String,
    api_key: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OctoPrintClient {
    pub fn new(config: &OctoPrintConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout: config.timeout,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<reqwest::Response, TransportError> {
        let mut request = self
            .client
            .request(method, self.url(path))
            .header("X-Api-Key", &self.api_key)
            .timeout(self.timeout);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|source| TransportError::Request {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl Transport for OctoPrintClient {
    async fn get(&self, path: &str) -> Result<Value, TransportError> {
        debug!("GET {}", path);
        let response = self.send(Method::GET, path, None).await?;
        response
            .json()
            .await
            .map_err(|source| TransportError::Request {
                path: path.to_string(),
                source,
            })
    }

    async fn patch(&self, path: &str, body: Value) -> Result<(), TransportError> {
        debug!("PATCH {}", path);
        self.send(Method::PATCH, path, Some(body)).await?;
        Ok(())
    }

    async fn post(&self, path: &str, body: Value) -> Result<(), TransportError> {
        debug!("POST {}", path);
        self.send(Method::POST, path, Some(body)).await?;
        Ok(())
    }
}
