//! HTTP transport for the roadmap backend.
//!
//! Every concept call is a `POST {base_url}/api/{concept}/{action}` carrying a
//! JSON body. Configuration comes from [`ClientConfig`]:
//! - `base_url` - Backend root (default: `http://localhost:8000`)
//! - `request_timeout` - Applied to every request, storage transfers included

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use serde_json::Value;

use super::gateway::{Gateway, GatewayError, ObjectStorage, StorageError};
use crate::config::ClientConfig;

/// reqwest-backed [`Gateway`] and [`ObjectStorage`].
#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: String,
    client: Client,
}

impl HttpGateway {
    /// Create with explicit configuration.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        Self::new(config.base_url.clone(), config.request_timeout)
    }

    fn endpoint(&self, concept: &str, action: &str) -> String {
        format!("{}/api/{}/{}", self.base_url, concept, action)
    }

    /// Send a concept call and normalize the envelope.
    async fn post(&self, concept: &str, action: &str, body: Value) -> Result<Value, GatewayError> {
        let url = self.endpoint(concept, action);
        tracing::debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;
        let parsed: Option<Value> = serde_json::from_str(&text).ok();

        if status.is_success() {
            let value = parsed.unwrap_or(Value::Null);
            match error_field(&value) {
                Some(msg) => Err(GatewayError::Remote(msg)),
                None => Ok(value),
            }
        } else if let Some(msg) = parsed.as_ref().and_then(error_field) {
            Err(GatewayError::Remote(msg))
        } else {
            Err(status_error(status))
        }
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn invoke_action(
        &self,
        concept: &str,
        action: &str,
        body: Value,
    ) -> Result<Value, GatewayError> {
        self.post(concept, action, body).await
    }

    async fn invoke_query(
        &self,
        concept: &str,
        query: &str,
        body: Value,
    ) -> Result<Vec<Value>, GatewayError> {
        let value = self.post(concept, query, body).await?;
        query_rows(value)
    }
}

#[async_trait]
impl ObjectStorage for HttpGateway {
    async fn upload(
        &self,
        url: &str,
        content: &str,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let response = self
            .client
            .put(url)
            .header(CONTENT_TYPE, content_type)
            .body(content.to_string())
            .send()
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(storage_status(status))
        }
    }

    async fn download(&self, url: &str) -> Result<String, StorageError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(storage_status(status));
        }
        response
            .text()
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))
    }
}

fn error_field(value: &Value) -> Option<String> {
    value.get("error").map(|e| match e.as_str() {
        Some(s) => s.to_string(),
        None => e.to_string(),
    })
}

fn reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Unknown error")
        .to_string()
}

fn status_error(status: StatusCode) -> GatewayError {
    GatewayError::Status {
        status: status.as_u16(),
        reason: reason(status),
    }
}

fn storage_status(status: StatusCode) -> StorageError {
    StorageError::Status {
        status: status.as_u16(),
        reason: reason(status),
    }
}

fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_decode() {
        GatewayError::Decode(e.to_string())
    } else {
        tracing::warn!("Request failed: {}", e);
        GatewayError::Network
    }
}

/// Unwrap query rows. The backend either answers with a bare array or wraps
/// the rows in `{ "results": [...] }` when the call was routed through its
/// request broker.
pub(crate) fn query_rows(value: Value) -> Result<Vec<Value>, GatewayError> {
    match value {
        Value::Array(rows) => Ok(rows),
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(rows)) => Ok(rows),
            Some(other) => Err(match error_field(&other) {
                Some(msg) => GatewayError::Remote(msg),
                None => GatewayError::Decode("query results are not a list".to_string()),
            }),
            None => Err(GatewayError::Decode(
                "query response is not a list".to_string(),
            )),
        },
        _ => Err(GatewayError::Decode(
            "query response is not a list".to_string(),
        )),
    }
}
