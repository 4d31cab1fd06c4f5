use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One row per orchestrated run, persisted to `collection_stats`.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionRunStats {
    pub run_id: Uuid,
    pub collection_date: DateTime<Utc>,
    pub source: String,
    pub total_items: i64,
    pub new_items: i64,
    pub updated_items: i64,
    pub errors: i64,
}

/// Structured result of one full collection cycle. Always returned, even when
/// every source failed or zero items were collected.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub sources_processed: Vec<String>,
    pub total_items_collected: usize,
    pub new_items: usize,
    pub updated_items: usize,
    pub threats_detected: usize,
    pub errors: Vec<String>,
}
