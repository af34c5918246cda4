use crate::core::error::ChatError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Status and raw body of one HTTP exchange. The body is kept as text so
/// the caller can decide which envelope to parse it as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue exactly one JSON POST. Non-2xx statuses are returned as a
    /// reply, only failures to complete the exchange are errors.
    async fn post_json(
        &self,
        endpoint: &str,
        headers: &[(String, String)],
        payload: &serde_json::Value,
    ) -> Result<HttpReply, ChatError>;
}

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Option<Duration>) -> Result<Self, ChatError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn post_json(
        &self,
        endpoint: &str,
        headers: &[(String, String)],
        payload: &serde_json::Value,
    ) -> Result<HttpReply, ChatError> {
        let mut request = self
            .client
            .post(endpoint)
            .header("Content-Type", "application/json");

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request.json(payload).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(endpoint, status, bytes = body.len(), "received provider response");

        Ok(HttpReply { status, body })
    }
}
