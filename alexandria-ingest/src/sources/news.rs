//! News threat monitoring — keyword searches against a NewsAPI-style
//! endpoint, classified into threat events.
//!
//! The whole stage is credential-gated: with no API key configured,
//! `collect_threats` reports `MissingApiKey` and the orchestrator downgrades
//! that to a skipped stage with an empty result.

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use alexandria_core::config::AlexandriaConfig;
use alexandria_core::models::ThreatEvent;

use crate::threats::classify_article;

use super::{http_client, SourceError};

/// One article from the news search API.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "publishedAt", default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub source: Option<NewsArticleSource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsArticleSource {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    articles: Vec<NewsArticle>,
}

pub struct NewsMonitor {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    keywords: Vec<String>,
    window_days: i64,
    rate_limit_delay: Duration,
}

impl NewsMonitor {
    pub fn new(config: &AlexandriaConfig) -> Result<Self, SourceError> {
        Ok(Self {
            client: http_client()?,
            base_url: config.sources.news_api_base_url.clone(),
            api_key: config.news.api_key.clone(),
            keywords: config.news.keywords.clone(),
            window_days: config.news.window_days,
            rate_limit_delay: Duration::from_secs_f64(config.collection.rate_limit_delay_secs),
        })
    }

    /// Create a monitor with a custom base URL (for testing / integration)
    pub fn with_base_url(
        config: &AlexandriaConfig,
        base_url: String,
    ) -> Result<Self, SourceError> {
        let mut monitor = Self::new(config)?;
        monitor.base_url = base_url;
        Ok(monitor)
    }

    /// Search every configured keyword and classify the resulting articles
    /// into threat events. Fails with `MissingApiKey` when no credential is
    /// configured so the caller can branch on the kind.
    pub async fn collect_threats(&self) -> Result<Vec<ThreatEvent>, SourceError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(SourceError::MissingApiKey);
        };

        let from = (Utc::now() - chrono::Duration::days(self.window_days)).to_rfc3339();
        let mut events = Vec::new();

        for keyword in &self.keywords {
            let url = format!("{}/everything", self.base_url);
            let response = self
                .client
                .get(&url)
                .query(&[
                    ("q", keyword.as_str()),
                    ("language", "en"),
                    ("sortBy", "relevancy"),
                    ("from", from.as_str()),
                    ("apiKey", api_key),
                ])
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(SourceError::Api {
                    code: status.as_u16(),
                    message,
                });
            }

            let body: NewsResponse = response.json().await?;
            let detected = Utc::now();
            for article in &body.articles {
                events.push(classify_article(article, keyword, detected));
            }

            tokio::time::sleep(self.rate_limit_delay).await;
        }

        tracing::info!(incidents = events.len(), "Threat monitoring completed");
        Ok(events)
    }
}
