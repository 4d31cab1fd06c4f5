//! Threat classifier — one raw news article in, one `ThreatEvent` out.
//!
//! Severity is decided by lexicon precedence: the high-severity terms are
//! checked before the medium ones, so an article mentioning both classifies
//! High.

use chrono::{DateTime, Utc};

use alexandria_core::models::{Severity, ThreatEvent};

use crate::sources::news::NewsArticle;

/// High-severity lexicon, checked first.
const HIGH_SEVERITY_TERMS: &[&str] = &["destroyed", "burned", "demolished", "stolen", "looted"];

/// Medium-severity lexicon, consulted only when no high-severity term hits.
const MEDIUM_SEVERITY_TERMS: &[&str] = &["damaged", "vandalized", "threatened", "at risk"];

/// Severity of an incident from the lower-cased title + description.
pub fn assess_severity(title: &str, description: &str) -> Severity {
    let content = format!("{} {}", title, description).to_lowercase();

    if HIGH_SEVERITY_TERMS
        .iter()
        .any(|term| content.contains(term))
    {
        Severity::High
    } else if MEDIUM_SEVERITY_TERMS
        .iter()
        .any(|term| content.contains(term))
    {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Convert one article into a threat event. The event stays unlinked to any
/// stored heritage record; matching is a separate concern.
pub fn classify_article(
    article: &NewsArticle,
    keyword: &str,
    detected: DateTime<Utc>,
) -> ThreatEvent {
    let title = article.title.as_deref().unwrap_or_default();
    let description = article.description.as_deref().unwrap_or_default();

    ThreatEvent {
        heritage_item_id: None,
        threat_type: keyword.to_string(),
        severity: assess_severity(title, description),
        description: title.to_string(),
        detected_date: detected,
        source: article
            .source
            .as_ref()
            .and_then(|s| s.name.clone())
            .unwrap_or_else(|| "news".to_string()),
    }
}
