//! Deduplicating persistent store for heritage records and threat events.
//!
//! Identity is the `content_hash` column (unique), so `upsert` is a single
//! `INSERT .. ON CONFLICT .. DO UPDATE` statement: concurrent writers for the
//! same identity key resolve to exactly one row, last write wins on the
//! mutable fields. The `revision` counter (0 on insert, incremented on every
//! conflict-update) is what tells Created from Updated without a second query.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::AlexandriaError;
use crate::models::{CollectionRunStats, HeritageRecord, ThreatEvent};

/// Result of upserting a heritage record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

#[derive(Debug, Clone)]
pub struct HeritageStore {
    pool: SqlitePool,
}

impl HeritageStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Read-only access for the aggregator.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert-if-absent, update-if-present on the record's identity key.
    /// Only `significance_score`, `threat_level`, `last_updated` and
    /// `metadata` are mutable; `created_at` survives every update.
    pub async fn upsert(&self, record: &HeritageRecord) -> Result<UpsertOutcome, AlexandriaError> {
        let revision: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO heritage_items
                (name, location, type, period, significance_score, threat_level,
                 created_at, last_updated, source, metadata, content_hash, revision)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0)
            ON CONFLICT(content_hash) DO UPDATE SET
                significance_score = excluded.significance_score,
                threat_level = excluded.threat_level,
                last_updated = excluded.last_updated,
                metadata = excluded.metadata,
                revision = revision + 1
            RETURNING revision
            "#,
        )
        .bind(&record.name)
        .bind(&record.location)
        .bind(&record.kind)
        .bind(&record.period)
        .bind(record.significance_score)
        .bind(record.threat_level)
        .bind(record.last_updated)
        .bind(record.last_updated)
        .bind(&record.source)
        .bind(sqlx::types::Json(&record.metadata))
        .bind(&record.content_hash)
        .fetch_one(&self.pool)
        .await?;

        if revision == 0 {
            Ok(UpsertOutcome::Created)
        } else {
            Ok(UpsertOutcome::Updated)
        }
    }

    /// Append one threat incident. Always inserts; threat events are never
    /// deduplicated or revisited.
    pub async fn append_threat(&self, event: &ThreatEvent) -> Result<i64, AlexandriaError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO threat_monitoring
                (heritage_item_id, threat_type, severity, description, detected_date, source)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(event.heritage_item_id)
        .bind(&event.threat_type)
        .bind(event.severity)
        .bind(&event.description)
        .bind(event.detected_date)
        .bind(&event.source)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Persist the per-run statistics row.
    pub async fn record_run(&self, stats: &CollectionRunStats) -> Result<(), AlexandriaError> {
        sqlx::query(
            r#"
            INSERT INTO collection_stats
                (run_id, collection_date, source, total_items, new_items, updated_items, errors)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(stats.run_id.to_string())
        .bind(stats.collection_date)
        .bind(&stats.source)
        .bind(stats.total_items)
        .bind(stats.new_items)
        .bind(stats.updated_items)
        .bind(stats.errors)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Look up one record by its identity key.
    pub async fn fetch_by_hash(
        &self,
        content_hash: &str,
    ) -> Result<Option<HeritageRecord>, AlexandriaError> {
        let record = sqlx::query_as::<_, HeritageRecord>(
            r#"
            SELECT name, location, type, period, significance_score, threat_level,
                   last_updated, source, metadata, content_hash
            FROM heritage_items
            WHERE content_hash = ?
            "#,
        )
        .bind(content_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Creation timestamp of a stored record. Immutable across updates.
    pub async fn created_at(
        &self,
        content_hash: &str,
    ) -> Result<Option<DateTime<Utc>>, AlexandriaError> {
        let created: Option<DateTime<Utc>> =
            sqlx::query_scalar("SELECT created_at FROM heritage_items WHERE content_hash = ?")
                .bind(content_hash)
                .fetch_optional(&self.pool)
                .await?;
        Ok(created)
    }
}
