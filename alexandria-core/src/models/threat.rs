use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of one detected threat incident, derived by lexicon rule.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

/// One detected threat incident. Append-only: never updated or deduplicated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatEvent {
    /// Weak reference to a stored heritage item; unresolved unless an
    /// explicit matching pass links it later.
    pub heritage_item_id: Option<i64>,
    /// The search keyword or category that surfaced the incident.
    pub threat_type: String,
    pub severity: Severity,
    pub description: String,
    pub detected_date: DateTime<Utc>,
    pub source: String,
}
