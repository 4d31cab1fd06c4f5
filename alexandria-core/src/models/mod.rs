pub mod heritage;
pub mod metadata;
pub mod stats;
pub mod threat;

pub use heritage::{content_hash, HeritageRecord, ThreatLevel};
pub use metadata::{MuseumMetadata, RecordMetadata, RegistryMetadata};
pub use stats::{CollectionRunStats, RunResult};
pub use threat::{Severity, ThreatEvent};
