use super::Transport;
use crate::libs::error::TransportError;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

include!(concat!(env!("OUT_DIR"), "/app_metadata.rs"));

/// HTTP client settings.
///
/// Timeout policy lives here, not in the controller. Without `timeout_secs`
/// requests wait as long as `reqwest` does by default.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HttpConfig {
    /// Value of the `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Overall per-request timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("{}/{}", APP_METADATA_NAME, APP_METADATA_VERSION),
            timeout_secs: None,
        }
    }
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &HttpConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| TransportError::Request {
            url: String::new(),
            message: e.to_string(),
        })?;
        Ok(Self { client })
    }

    async fn send(&self, url: &str) -> Result<Response, TransportError> {
        tracing::debug!(url, "GET");
        let response = self.client.get(url).send().await.map_err(|e| request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self { client: Client::new() }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, TransportError> {
        let response = self.send(url).await?;
        response.json::<serde_json::Value>().await.map_err(|e| TransportError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    async fn download(&self, url: &str, destination: &Path) -> Result<u64, TransportError> {
        let mut response = self.send(url).await?;
        let mut out = File::create(destination).await?;
        let mut written = 0u64;

        while let Some(chunk) = response.chunk().await.map_err(|e| request_error(url, e))? {
            out.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        out.flush().await?;

        tracing::debug!(url, bytes = written, destination = %destination.display(), "download finished");
        Ok(written)
    }
}

fn request_error(url: &str, error: reqwest::Error) -> TransportError {
    TransportError::Request {
        url: url.to_string(),
        message: error.to_string(),
    }
}
