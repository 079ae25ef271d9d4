//! HTTP transport: each remote call is a JSON POST to `{base_url}/{endpoint}`

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use txdesk_config::BackendConfig;

use crate::error::{CoreError, CoreResult};
use crate::transport::Transport;
use crate::types::Endpoint;

pub struct HttpTransport {
    http_client: HttpClient,
    backend: BackendConfig,
}

impl HttpTransport {
    pub fn new(backend: BackendConfig) -> Self {
        Self {
            http_client: HttpClient::new(),
            backend,
        }
    }

    fn transport_error(endpoint: Endpoint, message: impl Into<String>) -> CoreError {
        CoreError::Transport {
            endpoint: endpoint.to_string(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, endpoint: Endpoint, params: serde_json::Value) -> CoreResult<serde_json::Value> {
        let url = self.backend.endpoint_url(endpoint.as_str());

        let response = self
            .http_client
            .post(&url)
            .json(&params)
            .send()
            .await
            .map_err(|e| Self::transport_error(endpoint, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Self::transport_error(endpoint, e.to_string()))?;

        if !status.is_success() {
            log::warn!("{} returned HTTP {}", url, status.as_u16());
            return Err(Self::transport_error(
                endpoint,
                format!("HTTP {}: {}", status.as_u16(), body),
            ));
        }

        // Mutations answer with an empty body
        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| CoreError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let transport = HttpTransport::new(BackendConfig {
            base_url: "http://127.0.0.1:9".to_string(),
        });

        let err = transport
            .call(Endpoint::Employees, serde_json::Value::Null)
            .await
            .unwrap_err();

        match err {
            CoreError::Transport { endpoint, .. } => assert_eq!(endpoint, "employees"),
            other => panic!("expected transport error, got {:?}", other),
        }
    }
}
