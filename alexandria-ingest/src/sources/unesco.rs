use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tokio::sync::Mutex;

use alexandria_core::config::SourcesConfig;

use super::{http_client, SourceAdapter, SourceError, SourceKind};

/// Heritage-site registry adapter. The registry publishes its whole list in
/// one document, so `list_candidate_ids` performs the single fetch and caches
/// the sites; `fetch` then serves individual payloads from that cache.
pub struct UnescoAdapter {
    client: Client,
    base_url: String,
    cache: Mutex<HashMap<String, Value>>,
}

impl UnescoAdapter {
    pub fn new(config: &SourcesConfig) -> Result<Self, SourceError> {
        Ok(Self {
            client: http_client()?,
            base_url: config.unesco_api_base_url.clone(),
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Create an adapter with a custom base URL (for testing / integration)
    pub fn with_base_url(base_url: String) -> Result<Self, SourceError> {
        Ok(Self {
            client: http_client()?,
            base_url,
            cache: Mutex::new(HashMap::new()),
        })
    }

    async fn refresh(&self) -> Result<Vec<String>, SourceError> {
        let response = self.client.get(&self.base_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let sites: Vec<Value> = response.json().await?;

        let mut cache = self.cache.lock().await;
        cache.clear();
        let mut ids = Vec::with_capacity(sites.len());
        for (index, site) in sites.into_iter().enumerate() {
            let id = site_id(&site, index);
            ids.push(id.clone());
            cache.insert(id, site);
        }
        Ok(ids)
    }
}

fn site_id(site: &Value, index: usize) -> String {
    match &site["unique_number"] {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => index.to_string(),
    }
}

#[async_trait]
impl SourceAdapter for UnescoAdapter {
    fn name(&self) -> &str {
        "UNESCO"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Registry
    }

    async fn list_candidate_ids(&self) -> Result<Vec<String>, SourceError> {
        self.refresh().await
    }

    async fn fetch(&self, id: &str) -> Result<Value, SourceError> {
        if let Some(site) = self.cache.lock().await.get(id) {
            return Ok(site.clone());
        }

        // Cache miss: the list hasn't been fetched yet in this session.
        self.refresh().await?;
        self.cache
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SourceError::Payload(format!("unknown site id {id}")))
    }
}
