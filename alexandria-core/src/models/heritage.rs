use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::metadata::RecordMetadata;

/// Coarse risk classification for a stored heritage asset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
}

impl ThreatLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatLevel::Low => "Low",
            ThreatLevel::Medium => "Medium",
            ThreatLevel::High => "High",
        }
    }
}

/// Identity key for deduplication: a deterministic digest over
/// `(name, location, source)`. Two sightings with the same triple are the
/// same asset.
pub fn content_hash(name: &str, location: &str, source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update([0x1f]);
    hasher.update(location.as_bytes());
    hasher.update([0x1f]);
    hasher.update(source.as_bytes());
    hex::encode(hasher.finalize())
}

/// Canonical representation of one cultural asset.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct HeritageRecord {
    pub name: String,
    pub location: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub period: String,
    pub significance_score: f64,
    pub threat_level: ThreatLevel,
    pub last_updated: DateTime<Utc>,
    pub source: String,
    #[sqlx(json)]
    pub metadata: RecordMetadata,
    pub content_hash: String,
}

impl HeritageRecord {
    /// Build a record with its identity key computed and the significance
    /// score clamped into `[0, 10]`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        location: String,
        kind: String,
        period: String,
        significance_score: f64,
        threat_level: ThreatLevel,
        source: String,
        metadata: RecordMetadata,
    ) -> Self {
        let content_hash = content_hash(&name, &location, &source);
        Self {
            name,
            location,
            kind,
            period,
            significance_score: significance_score.clamp(0.0, 10.0),
            threat_level,
            last_updated: Utc::now(),
            source,
            metadata,
            content_hash,
        }
    }
}
