use crate::circuit_breaker::{create_backend_circuit_breaker, BackendBreaker};
use crate::config::Config;
use crate::errors::{AppError, FetchError};
use failsafe::futures::CircuitBreaker;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// JSON transport to the backend API.
///
/// Every call returns `Result<_, FetchError>`; deciding between fallback and
/// propagation is left to the caller.
#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    breaker: BackendBreaker,
}

impl BackendClient {
    /// Creates a new `BackendClient` from the configured base URL and timeout.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                AppError::InternalError(format!("Failed to create backend client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            breaker: create_backend_circuit_breaker(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an endpoint path such as `suppliers/`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Resolves a pagination cursor, which may be absolute or relative to the base URL.
    pub fn resolve(&self, next: &str) -> Result<String, FetchError> {
        if next.starts_with("http://") || next.starts_with("https://") {
            return Ok(next.to_string());
        }
        let base = url::Url::parse(&format!("{}/", self.base_url))
            .map_err(|e| FetchError::Decode(format!("invalid base URL: {}", e)))?;
        base.join(next)
            .map(|u| u.to_string())
            .map_err(|e| FetchError::Decode(format!("invalid next cursor '{}': {}", next, e)))
    }

    /// GET an absolute URL and return the raw JSON body.
    pub async fn get_value(&self, url: &str) -> Result<Value, FetchError> {
        tracing::debug!("GET {}", url);
        self.execute(self.client.get(url)).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let value = self.get_value(&self.endpoint(path)).await?;
        decode(value)
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, FetchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        tracing::debug!("POST {}", url);
        let value = self.execute(self.client.post(&url).json(body)).await?;
        decode(value)
    }

    /// True when `path` answers with a success status. Never errors.
    pub async fn probe(&self, path: &str) -> bool {
        let url = self.endpoint(path);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Health probe {} failed: {}", url, e);
                false
            }
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Value, FetchError> {
        let call = async move {
            let response = request.send().await.map_err(FetchError::from_reqwest)?;

            let status = response.status();
            if !status.is_success() {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(FetchError::from_status(status.as_u16(), &error_text));
            }

            let text = response.text().await.map_err(FetchError::from_reqwest)?;
            serde_json::from_str::<Value>(&text)
                .map_err(|e| FetchError::Decode(format!("body is not JSON: {}", e)))
        };

        match self
            .breaker
            .call_with(FetchError::is_transport_failure, call)
            .await
        {
            Ok(value) => Ok(value),
            Err(failsafe::Error::Inner(e)) => Err(e),
            Err(failsafe::Error::Rejected) => Err(FetchError::CircuitOpen),
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, FetchError> {
    serde_json::from_value(value).map_err(|e| FetchError::Decode(e.to_string()))
}
