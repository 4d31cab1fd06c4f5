//! Normalizer/Scorer — one raw source payload in, one canonical
//! `HeritageRecord` out.
//!
//! Scoring is a pure function of the payload: no I/O, no randomness,
//! reproducible given identical input. Payloads failing the eligibility
//! filter are dropped (`None`), not errors.

use serde_json::Value;

use alexandria_core::models::{
    HeritageRecord, MuseumMetadata, RecordMetadata, RegistryMetadata, ThreatLevel,
};

use crate::sources::SourceKind;

/// Widely recognized creators whose work scores an extra 2.0.
const REFERENCE_CREATORS: &[&str] = &[
    "Leonardo da Vinci",
    "Michelangelo",
    "Vincent van Gogh",
    "Pablo Picasso",
    "Claude Monet",
    "Rembrandt",
    "Auguste Rodin",
];

/// Antiquity markers in the free-text object date.
const ANTIQUITY_MARKERS: &[&str] = &["bc", "century", "dynasty"];

/// Conflict-affected territories. A location match forces threat level High.
const HIGH_RISK_REGIONS: &[&str] = &[
    "Syria",
    "Iraq",
    "Afghanistan",
    "Yemen",
    "Libya",
    "Ukraine",
    "Myanmar",
    "Mali",
];

const BASE_SCORE: f64 = 5.0;
const MAX_SCORE: f64 = 10.0;

/// Normalize one raw payload under the rules for its source kind.
pub fn normalize(
    payload: &Value,
    source: &str,
    kind: SourceKind,
    reference_year: i32,
) -> Option<HeritageRecord> {
    match kind {
        SourceKind::Museum => normalize_museum(payload, source),
        SourceKind::Registry => normalize_registry(payload, source, reference_year),
    }
}

fn normalize_museum(payload: &Value, source: &str) -> Option<HeritageRecord> {
    let title = text(payload, "title");
    if title.is_empty() || !flag(payload, "isPublicDomain") {
        return None;
    }

    let location = join_location(text(payload, "city"), text(payload, "country"));
    let kind = match text(payload, "classification") {
        "" => "artwork".to_string(),
        classification => classification.to_string(),
    };
    let period = match (text(payload, "period"), text(payload, "dynasty")) {
        ("", "") => "Unknown".to_string(),
        ("", dynasty) => dynasty.to_string(),
        (period, _) => period.to_string(),
    };

    let metadata = RecordMetadata::Museum(MuseumMetadata {
        object_id: payload["objectID"].as_i64(),
        artist: opt_text(payload, "artistDisplayName"),
        date: opt_text(payload, "objectDate"),
        medium: opt_text(payload, "medium"),
        dimensions: opt_text(payload, "dimensions"),
        department: opt_text(payload, "department"),
        accession_number: opt_text(payload, "accessionNumber"),
        public_domain: flag(payload, "isPublicDomain"),
        primary_image: opt_text(payload, "primaryImage"),
        gallery_number: opt_text(payload, "GalleryNumber"),
    });

    Some(HeritageRecord::new(
        title.to_string(),
        location,
        kind,
        period,
        museum_significance(payload),
        museum_threat_level(payload),
        source.to_string(),
        metadata,
    ))
}

fn normalize_registry(payload: &Value, source: &str, reference_year: i32) -> Option<HeritageRecord> {
    let name = text(payload, "site");
    if name.is_empty() {
        return None;
    }

    // Unparseable inscription dates fall back to the reference year: the
    // site still scores the 9.0 floor, just without an age bonus.
    let inscribed = year(&payload["date_inscribed"]).unwrap_or(reference_year);
    let on_danger_list = flag_is_set(&payload["danger"]);
    let threat_level = if on_danger_list {
        ThreatLevel::High
    } else {
        ThreatLevel::Medium
    };

    let period = match &payload["date_inscribed"] {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => "Unknown".to_string(),
    };

    let metadata = RecordMetadata::Registry(RegistryMetadata {
        unique_number: opt_text(payload, "unique_number")
            .or_else(|| payload["unique_number"].as_i64().map(|n| n.to_string())),
        criteria: opt_text(payload, "criteria"),
        category: opt_text(payload, "category"),
        short_description: opt_text(payload, "short_description"),
        longitude: num(&payload["longitude"]),
        latitude: num(&payload["latitude"]),
        area_hectares: num(&payload["area_hectares"]),
        danger_list: on_danger_list,
        transboundary: flag_is_set(&payload["transboundary"]),
    });

    Some(HeritageRecord::new(
        name.to_string(),
        text(payload, "states").to_string(),
        "heritage_site".to_string(),
        period,
        registry_significance(inscribed, reference_year),
        threat_level,
        source.to_string(),
        metadata,
    ))
}

/// Artifact significance: base 5.0 plus bonuses for recognized creators,
/// antiquity, public-domain status, imagery, and public display, capped
/// at 10.0.
pub fn museum_significance(payload: &Value) -> f64 {
    let mut score = BASE_SCORE;

    let artist = text(payload, "artistDisplayName");
    if REFERENCE_CREATORS
        .iter()
        .any(|creator| artist.contains(creator))
    {
        score += 2.0;
    }

    let date = text(payload, "objectDate").to_lowercase();
    if ANTIQUITY_MARKERS.iter().any(|marker| date.contains(marker)) {
        score += 1.5;
    }

    if flag(payload, "isPublicDomain") {
        score += 0.5;
    }
    if !text(payload, "primaryImage").is_empty() {
        score += 0.5;
    }
    if flag(payload, "isOnView") {
        score += 0.5;
    }

    score.min(MAX_SCORE)
}

/// Threat level for a museum object: High in conflict regions, Low under
/// institutional custody, Medium otherwise.
pub fn museum_threat_level(payload: &Value) -> ThreatLevel {
    let country = text(payload, "country").to_lowercase();
    if HIGH_RISK_REGIONS
        .iter()
        .any(|region| country.contains(&region.to_lowercase()))
    {
        ThreatLevel::High
    } else if flag(payload, "isOnView") {
        ThreatLevel::Low
    } else {
        ThreatLevel::Medium
    }
}

/// Inscription-age significance for registry sites: the longer a site has
/// been listed, the higher the score, saturating at 10.0.
pub fn registry_significance(inscription_year: i32, reference_year: i32) -> f64 {
    (9.0 + f64::from(reference_year - inscription_year) / 100.0).min(MAX_SCORE)
}

fn text<'a>(payload: &'a Value, field: &str) -> &'a str {
    payload[field].as_str().unwrap_or_default()
}

fn opt_text(payload: &Value, field: &str) -> Option<String> {
    payload[field]
        .as_str()
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn flag(payload: &Value, field: &str) -> bool {
    payload[field].as_bool().unwrap_or(false)
}

/// Coordinates and areas arrive as numbers in some feeds and strings in
/// others.
fn num(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().map(|y| y as i32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Danger/transboundary flags arrive as "1"/"0" strings in some feeds and
/// numbers or booleans in others.
fn flag_is_set(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => s == "1",
        _ => false,
    }
}

fn join_location(city: &str, country: &str) -> String {
    match (city.is_empty(), country.is_empty()) {
        (true, true) => String::new(),
        (false, true) => city.to_string(),
        (true, false) => country.to_string(),
        (false, false) => format!("{city}, {country}"),
    }
}
