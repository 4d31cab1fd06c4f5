//! Read-only aggregation over the store: per-source counts and mean
//! significance, threat-level distribution, recent threat activity, and the
//! most-represented locations.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::AlexandriaError;
use crate::models::ThreatLevel;

/// How far back a threat event still counts as "recent".
const RECENT_THREAT_WINDOW_DAYS: i64 = 7;

/// Maximum number of entries in the top-locations ranking.
const TOP_LOCATIONS_LIMIT: i64 = 10;

#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub count: i64,
    pub avg_significance: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationCount {
    pub location: String,
    pub count: i64,
}

/// Summary statistics over all stored state.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionReport {
    pub collection_date: DateTime<Utc>,
    pub total_items: i64,
    pub sources: BTreeMap<String, SourceSummary>,
    pub threat_distribution: BTreeMap<ThreatLevel, i64>,
    pub recent_threats: i64,
    pub top_locations: Vec<LocationCount>,
}

pub async fn generate_report(pool: &SqlitePool) -> Result<CollectionReport, AlexandriaError> {
    let collection_date = Utc::now();

    let source_rows: Vec<(String, i64, f64)> = sqlx::query_as(
        r#"
        SELECT source, COUNT(*), AVG(significance_score)
        FROM heritage_items
        GROUP BY source
        "#,
    )
    .fetch_all(pool)
    .await?;

    let total_items = source_rows.iter().map(|(_, count, _)| count).sum();
    let sources = source_rows
        .into_iter()
        .map(|(source, count, avg_significance)| {
            (
                source,
                SourceSummary {
                    count,
                    avg_significance,
                },
            )
        })
        .collect();

    let threat_rows: Vec<(ThreatLevel, i64)> = sqlx::query_as(
        r#"
        SELECT threat_level, COUNT(*)
        FROM heritage_items
        GROUP BY threat_level
        "#,
    )
    .fetch_all(pool)
    .await?;
    let threat_distribution = threat_rows.into_iter().collect();

    let cutoff = collection_date - Duration::days(RECENT_THREAT_WINDOW_DAYS);
    let recent_threats: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM threat_monitoring WHERE detected_date > ?")
            .bind(cutoff)
            .fetch_one(pool)
            .await?;

    // Ties broken by first-seen row id so the ranking is reproducible.
    let location_rows: Vec<(String, i64)> = sqlx::query_as(
        r#"
        SELECT location, COUNT(*) AS n
        FROM heritage_items
        WHERE location != ''
        GROUP BY location
        ORDER BY n DESC, MIN(id) ASC
        LIMIT ?
        "#,
    )
    .bind(TOP_LOCATIONS_LIMIT)
    .fetch_all(pool)
    .await?;
    let top_locations = location_rows
        .into_iter()
        .map(|(location, count)| LocationCount { location, count })
        .collect();

    Ok(CollectionReport {
        collection_date,
        total_items,
        sources,
        threat_distribution,
        recent_threats,
        top_locations,
    })
}
