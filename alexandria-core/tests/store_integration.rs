use chrono::{Duration, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use alexandria_core::models::{
    CollectionRunStats, HeritageRecord, MuseumMetadata, RecordMetadata, Severity, ThreatEvent,
    ThreatLevel,
};
use alexandria_core::report::generate_report;
use alexandria_core::store::{HeritageStore, UpsertOutcome};
use alexandria_core::db;

/// Single-connection pool: every connection to `sqlite::memory:` is its own
/// database, so the pool must never hand out a second one.
async fn memory_store() -> HeritageStore {
    let pool: SqlitePool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");
    db::init_schema(&pool).await.expect("Schema init failed");
    HeritageStore::new(pool)
}

fn record(name: &str, location: &str, source: &str, score: f64, threat: ThreatLevel) -> HeritageRecord {
    HeritageRecord::new(
        name.to_string(),
        location.to_string(),
        "artwork".to_string(),
        "19th century".to_string(),
        score,
        threat,
        source.to_string(),
        RecordMetadata::Museum(MuseumMetadata {
            artist: Some("test".to_string()),
            public_domain: true,
            ..Default::default()
        }),
    )
}

fn threat(severity: Severity, detected: chrono::DateTime<Utc>) -> ThreatEvent {
    ThreatEvent {
        heritage_item_id: None,
        threat_type: "art theft".to_string(),
        severity,
        description: "Painting stolen from gallery".to_string(),
        detected_date: detected,
        source: "news".to_string(),
    }
}

#[tokio::test]
async fn upsert_creates_then_updates() {
    let store = memory_store().await;

    let first = record("Water Lilies", "Paris, France", "Metropolitan Museum", 8.0, ThreatLevel::Low);
    assert_eq!(store.upsert(&first).await.unwrap(), UpsertOutcome::Created);

    let second = record("Water Lilies", "Paris, France", "Metropolitan Museum", 8.5, ThreatLevel::Medium);
    assert_eq!(store.upsert(&second).await.unwrap(), UpsertOutcome::Updated);

    // Exactly one row for the identity key, carrying the second payload's
    // mutable fields.
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM heritage_items")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);

    let stored = store
        .fetch_by_hash(&first.content_hash)
        .await
        .unwrap()
        .expect("Record missing after upsert");
    assert_eq!(stored.significance_score, 8.5);
    assert_eq!(stored.threat_level, ThreatLevel::Medium);
    match &stored.metadata {
        RecordMetadata::Museum(m) => assert_eq!(m.artist.as_deref(), Some("test")),
        other => panic!("Wrong metadata variant: {other:?}"),
    }
}

#[tokio::test]
async fn upsert_preserves_creation_timestamp() {
    let store = memory_store().await;

    let first = record("David", "Florence, Italy", "Metropolitan Museum", 9.0, ThreatLevel::Low);
    store.upsert(&first).await.unwrap();
    let created = store
        .created_at(&first.content_hash)
        .await
        .unwrap()
        .expect("created_at missing");

    let mut second = record("David", "Florence, Italy", "Metropolitan Museum", 9.5, ThreatLevel::Low);
    second.last_updated = first.last_updated + Duration::seconds(90);
    store.upsert(&second).await.unwrap();

    let created_after = store
        .created_at(&first.content_hash)
        .await
        .unwrap()
        .expect("created_at missing");
    assert_eq!(created, created_after);

    let stored = store.fetch_by_hash(&first.content_hash).await.unwrap().unwrap();
    assert!(stored.last_updated > first.last_updated);
}

#[tokio::test]
async fn distinct_identities_create_distinct_rows() {
    let store = memory_store().await;

    store
        .upsert(&record("Mona Lisa", "Paris, France", "Metropolitan Museum", 8.0, ThreatLevel::Low))
        .await
        .unwrap();
    store
        .upsert(&record("Mona Lisa", "Paris, France", "UNESCO", 8.0, ThreatLevel::Low))
        .await
        .unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM heritage_items")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn append_threat_never_deduplicates() {
    let store = memory_store().await;

    let event = threat(Severity::High, Utc::now());
    let first_id = store.append_threat(&event).await.unwrap();
    let second_id = store.append_threat(&event).await.unwrap();
    assert_ne!(first_id, second_id);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM threat_monitoring")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn record_run_persists_stats_row() {
    let store = memory_store().await;

    let stats = CollectionRunStats {
        run_id: Uuid::new_v4(),
        collection_date: Utc::now(),
        source: "full_collection".to_string(),
        total_items: 12,
        new_items: 9,
        updated_items: 3,
        errors: 1,
    };
    store.record_run(&stats).await.unwrap();

    let (total, errors): (i64, i64) =
        sqlx::query_as("SELECT total_items, errors FROM collection_stats")
            .fetch_one(store.pool())
            .await
            .unwrap();
    assert_eq!(total, 12);
    assert_eq!(errors, 1);
}

#[tokio::test]
async fn report_aggregates_sources_and_threat_levels() {
    let store = memory_store().await;

    store
        .upsert(&record("A", "Paris, France", "Metropolitan Museum", 6.0, ThreatLevel::Low))
        .await
        .unwrap();
    store
        .upsert(&record("B", "Paris, France", "Metropolitan Museum", 8.0, ThreatLevel::Medium))
        .await
        .unwrap();
    store
        .upsert(&record("C", "Giza, Egypt", "UNESCO", 10.0, ThreatLevel::Medium))
        .await
        .unwrap();

    let report = generate_report(store.pool()).await.unwrap();

    assert_eq!(report.total_items, 3);
    let met = &report.sources["Metropolitan Museum"];
    assert_eq!(met.count, 2);
    assert!((met.avg_significance - 7.0).abs() < 1e-9);
    assert_eq!(report.sources["UNESCO"].count, 1);

    assert_eq!(report.threat_distribution[&ThreatLevel::Low], 1);
    assert_eq!(report.threat_distribution[&ThreatLevel::Medium], 2);
    assert!(!report.threat_distribution.contains_key(&ThreatLevel::High));
}

#[tokio::test]
async fn report_counts_only_recent_threats() {
    let store = memory_store().await;

    store.append_threat(&threat(Severity::High, Utc::now())).await.unwrap();
    store
        .append_threat(&threat(Severity::Medium, Utc::now() - Duration::days(10)))
        .await
        .unwrap();

    let report = generate_report(store.pool()).await.unwrap();
    assert_eq!(report.recent_threats, 1);
}

#[tokio::test]
async fn top_locations_ranked_capped_and_nonempty() {
    let store = memory_store().await;

    // 12 distinct locations; "Rome, Italy" appears three times, "Paris,
    // France" twice, everything else once. Plus two records with no location.
    for i in 0..3 {
        store
            .upsert(&record(&format!("R{i}"), "Rome, Italy", "Metropolitan Museum", 5.0, ThreatLevel::Low))
            .await
            .unwrap();
    }
    for i in 0..2 {
        store
            .upsert(&record(&format!("P{i}"), "Paris, France", "Metropolitan Museum", 5.0, ThreatLevel::Low))
            .await
            .unwrap();
    }
    for i in 0..10 {
        store
            .upsert(&record(&format!("S{i}"), &format!("City {i}"), "UNESCO", 5.0, ThreatLevel::Low))
            .await
            .unwrap();
    }
    for i in 0..2 {
        store
            .upsert(&record(&format!("N{i}"), "", "UNESCO", 5.0, ThreatLevel::Low))
            .await
            .unwrap();
    }

    let report = generate_report(store.pool()).await.unwrap();

    assert_eq!(report.top_locations.len(), 10);
    assert_eq!(report.top_locations[0].location, "Rome, Italy");
    assert_eq!(report.top_locations[0].count, 3);
    assert_eq!(report.top_locations[1].location, "Paris, France");
    assert_eq!(report.top_locations[1].count, 2);
    assert!(report.top_locations.iter().all(|l| !l.location.is_empty()));

    // Singleton ties keep first-seen order.
    assert_eq!(report.top_locations[2].location, "City 0");
}

#[tokio::test]
async fn report_serializes_with_string_keys() {
    let store = memory_store().await;
    store
        .upsert(&record("A", "Paris, France", "Metropolitan Museum", 6.0, ThreatLevel::Low))
        .await
        .unwrap();

    let report = generate_report(store.pool()).await.unwrap();
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["threat_distribution"]["Low"], 1);
    assert_eq!(value["total_items"], 1);
}
