//! Collection orchestrator — drives one full run across all configured
//! sources.
//!
//! Failure isolation, from the bottom up:
//! - one item failing to fetch or normalize: logged, skipped
//! - one source failing outright: recorded as a run error, the next source
//!   still runs
//! - the store failing: fatal, aborts the run
//!
//! Every run writes one `collection_stats` row and returns a `RunResult`
//! enumerating any errors, even when zero items were collected.

use std::time::Duration;

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use alexandria_core::config::AlexandriaConfig;
use alexandria_core::models::{CollectionRunStats, RunResult};
use alexandria_core::store::{HeritageStore, UpsertOutcome};
use alexandria_core::AlexandriaError;

use crate::normalize::normalize;
use crate::sources::{NewsMonitor, SourceAdapter, SourceError};

/// Per-source accumulation of one run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceTally {
    pub collected: usize,
    pub new_items: usize,
    pub updated_items: usize,
}

/// Run a complete collection cycle: every adapter in order, then the news
/// stage, then the stats row.
pub async fn run_collection(
    pool: &SqlitePool,
    config: &AlexandriaConfig,
    adapters: &[Box<dyn SourceAdapter>],
    news: &NewsMonitor,
) -> Result<RunResult, AlexandriaError> {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    let store = HeritageStore::new(pool.clone());

    tracing::info!(%run_id, sources = adapters.len(), "Starting collection cycle");

    let mut sources_processed = Vec::new();
    let mut errors = Vec::new();
    let mut total = SourceTally::default();

    for adapter in adapters {
        let name = adapter.name().to_string();
        match collect_source(&store, config, adapter.as_ref()).await {
            Ok(tally) => {
                tracing::info!(
                    source = %name,
                    collected = tally.collected,
                    new = tally.new_items,
                    updated = tally.updated_items,
                    "Source collection completed"
                );
                sources_processed.push(name);
                total.collected += tally.collected;
                total.new_items += tally.new_items;
                total.updated_items += tally.updated_items;
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                let message = format!("{name} collection failed: {e}");
                tracing::error!(source = %name, error = %e, "Source collection failed");
                errors.push(message);
            }
        }
    }

    let mut threats_detected = 0;
    match monitor_threats(&store, news).await {
        Ok(count) => {
            threats_detected = count;
            sources_processed.push("Threat Monitoring".to_string());
        }
        Err(AlexandriaError::MissingCredential(credential)) => {
            // Skipped stage, not a run error: the run proceeds with an empty
            // threat result.
            tracing::warn!(%credential, "Skipping threat monitoring: credential not configured");
        }
        Err(e) if e.is_fatal() => return Err(e),
        Err(e) => {
            let message = format!("Threat monitoring failed: {e}");
            tracing::error!(error = %e, "Threat monitoring failed");
            errors.push(message);
        }
    }

    store
        .record_run(&CollectionRunStats {
            run_id,
            collection_date: started_at,
            source: "full_collection".to_string(),
            total_items: total.collected as i64,
            new_items: total.new_items as i64,
            updated_items: total.updated_items as i64,
            errors: errors.len() as i64,
        })
        .await?;

    let result = RunResult {
        run_id,
        started_at,
        finished_at: Utc::now(),
        sources_processed,
        total_items_collected: total.collected,
        new_items: total.new_items,
        updated_items: total.updated_items,
        threats_detected,
        errors,
    };

    tracing::info!(
        %run_id,
        total = result.total_items_collected,
        new = result.new_items,
        updated = result.updated_items,
        threats = result.threats_detected,
        errors = result.errors.len(),
        "Collection cycle completed"
    );

    Ok(result)
}

/// Collect one source: list candidates, fetch and upsert in batches with the
/// configured rate-limit delay in between.
async fn collect_source(
    store: &HeritageStore,
    config: &AlexandriaConfig,
    adapter: &dyn SourceAdapter,
) -> Result<SourceTally, AlexandriaError> {
    let ids = adapter
        .list_candidate_ids()
        .await
        .map_err(|e| AlexandriaError::SourceUnavailable(format!("{}: {e}", adapter.name())))?;

    let cap = ids.len().min(config.collection.max_items_per_source);
    tracing::info!(
        source = adapter.name(),
        candidates = ids.len(),
        cap,
        "Listed candidate items"
    );

    let mut tally = SourceTally::default();
    let delay = Duration::from_secs_f64(config.collection.rate_limit_delay_secs);

    for batch in ids[..cap].chunks(config.collection.batch_size.max(1)) {
        for id in batch {
            let payload = match adapter.fetch(id).await {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::warn!(source = adapter.name(), id = %id, error = %e, "Skipping item");
                    continue;
                }
            };

            let Some(record) = normalize(
                &payload,
                adapter.name(),
                adapter.kind(),
                config.collection.reference_year,
            ) else {
                // Filtered, not an error: the payload lacks required fields.
                continue;
            };

            match store.upsert(&record).await? {
                UpsertOutcome::Created => tally.new_items += 1,
                UpsertOutcome::Updated => tally.updated_items += 1,
            }
            tally.collected += 1;
        }

        tokio::time::sleep(delay).await;
    }

    Ok(tally)
}

/// Run the news stage and append every classified incident.
async fn monitor_threats(
    store: &HeritageStore,
    news: &NewsMonitor,
) -> Result<usize, AlexandriaError> {
    let events = news.collect_threats().await.map_err(|e| match e {
        SourceError::MissingApiKey => {
            AlexandriaError::MissingCredential("news_api_key".to_string())
        }
        other => AlexandriaError::SourceUnavailable(format!("news: {other}")),
    })?;

    let mut saved = 0;
    for event in &events {
        store.append_threat(event).await?;
        saved += 1;
    }

    Ok(saved)
}
