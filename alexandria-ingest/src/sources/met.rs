use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::Retry;

use alexandria_core::config::SourcesConfig;

use super::{http_client, SourceAdapter, SourceError, SourceKind};

const MAX_RETRIES: usize = 3;
const RETRY_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
struct MetObjectsResponse {
    #[serde(rename = "objectIDs")]
    object_ids: Option<Vec<i64>>,
}

/// Museum catalog adapter — lists object IDs for the configured departments,
/// then fetches object details one at a time.
pub struct MetMuseumAdapter {
    client: Client,
    base_url: String,
    department_ids: Vec<u32>,
}

impl MetMuseumAdapter {
    pub fn new(config: &SourcesConfig) -> Result<Self, SourceError> {
        Ok(Self {
            client: http_client()?,
            base_url: config.met_api_base_url.clone(),
            department_ids: config.met_department_ids.clone(),
        })
    }

    /// Create an adapter with a custom base URL (for testing / integration)
    pub fn with_base_url(base_url: String) -> Result<Self, SourceError> {
        Ok(Self {
            client: http_client()?,
            base_url,
            department_ids: Vec::new(),
        })
    }

    async fn fetch_once(&self, id: &str) -> Result<Value, SourceError> {
        let url = format!("{}/objects/{}", self.base_url, id);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                code: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl SourceAdapter for MetMuseumAdapter {
    fn name(&self) -> &str {
        "Metropolitan Museum"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Museum
    }

    async fn list_candidate_ids(&self) -> Result<Vec<String>, SourceError> {
        let url = format!("{}/objects", self.base_url);
        let mut request = self.client.get(&url);

        if !self.department_ids.is_empty() {
            let joined = self
                .department_ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join("|");
            request = request.query(&[("departmentIds", joined.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let body: MetObjectsResponse = response.json().await?;
        Ok(body
            .object_ids
            .unwrap_or_default()
            .into_iter()
            .map(|id| id.to_string())
            .collect())
    }

    async fn fetch(&self, id: &str) -> Result<Value, SourceError> {
        let retry_strategy = ExponentialBackoff::from_millis(RETRY_DELAY_MS)
            .max_delay(Duration::from_secs(5))
            .map(jitter)
            .take(MAX_RETRIES);

        match Retry::spawn(retry_strategy, || self.fetch_once(id)).await {
            Ok(payload) => Ok(payload),
            Err(e) => {
                tracing::warn!(id, error = %e, "Object fetch exhausted retries");
                Err(SourceError::RetryExhausted {
                    id: id.to_string(),
                    attempts: MAX_RETRIES,
                })
            }
        }
    }
}
