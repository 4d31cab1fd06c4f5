use serde::{Deserialize, Serialize};

/// Source-specific detail attached to a heritage record.
///
/// A closed sum over the known source payload shapes: the canonical record
/// stays statically typed while each source keeps its own fields. Stored as
/// tagged JSON, so adding a variant is a forward-compatible change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "source_kind", rename_all = "snake_case")]
pub enum RecordMetadata {
    Museum(MuseumMetadata),
    Registry(RegistryMetadata),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MuseumMetadata {
    pub object_id: Option<i64>,
    pub artist: Option<String>,
    pub date: Option<String>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub department: Option<String>,
    pub accession_number: Option<String>,
    pub public_domain: bool,
    pub primary_image: Option<String>,
    pub gallery_number: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryMetadata {
    pub unique_number: Option<String>,
    pub criteria: Option<String>,
    pub category: Option<String>,
    pub short_description: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub area_hectares: Option<f64>,
    pub danger_list: bool,
    pub transboundary: bool,
}
