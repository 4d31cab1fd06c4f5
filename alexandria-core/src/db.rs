use crate::config::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// Schema bootstrap, applied idempotently at startup. `content_hash` carries
/// the uniqueness constraint the upsert relies on.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS heritage_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        location TEXT NOT NULL DEFAULT '',
        type TEXT NOT NULL,
        period TEXT NOT NULL,
        significance_score REAL NOT NULL,
        threat_level TEXT NOT NULL CHECK (threat_level IN ('Low', 'Medium', 'High')),
        created_at TEXT NOT NULL,
        last_updated TEXT NOT NULL,
        source TEXT NOT NULL,
        metadata TEXT NOT NULL,
        content_hash TEXT NOT NULL UNIQUE,
        revision INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS threat_monitoring (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        heritage_item_id INTEGER,
        threat_type TEXT NOT NULL,
        severity TEXT NOT NULL CHECK (severity IN ('Low', 'Medium', 'High')),
        description TEXT NOT NULL,
        detected_date TEXT NOT NULL,
        source TEXT NOT NULL,
        FOREIGN KEY (heritage_item_id) REFERENCES heritage_items(id)
    )",
    "CREATE TABLE IF NOT EXISTS collection_stats (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        run_id TEXT NOT NULL,
        collection_date TEXT NOT NULL,
        source TEXT NOT NULL,
        total_items INTEGER NOT NULL,
        new_items INTEGER NOT NULL,
        updated_items INTEGER NOT NULL,
        errors INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_heritage_items_source ON heritage_items(source)",
    "CREATE INDEX IF NOT EXISTS idx_heritage_items_location ON heritage_items(location)",
    "CREATE INDEX IF NOT EXISTS idx_threat_monitoring_detected ON threat_monitoring(detected_date)",
];

pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(&config.path)
        .create_if_missing(true);
    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
}

pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::info!("Database schema initialized");
    Ok(())
}

pub async fn health_check(pool: &SqlitePool) -> Result<String, sqlx::Error> {
    let row: (String,) = sqlx::query_as("SELECT sqlite_version()")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}
