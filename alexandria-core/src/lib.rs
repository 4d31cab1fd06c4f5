pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod report;
pub mod store;

pub use config::AlexandriaConfig;
pub use error::AlexandriaError;
pub use models::{
    content_hash, CollectionRunStats, HeritageRecord, MuseumMetadata, RecordMetadata,
    RegistryMetadata, RunResult, Severity, ThreatEvent, ThreatLevel,
};
pub use report::{CollectionReport, LocationCount, SourceSummary};
pub use store::{HeritageStore, UpsertOutcome};
