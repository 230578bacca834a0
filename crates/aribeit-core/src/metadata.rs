//! Normalized program metadata and its host-facing mapping

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Program metadata decoded from one analyzer run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDateTime>,
    /// `major` or `major/middle`, in analyzer order
    pub genres: Vec<String>,
    /// Channel name, when the analyzer reported one
    pub tags: Vec<String>,
}

impl NormalizedMetadata {
    /// Map onto the item shape a media library stores
    pub fn to_item(&self) -> ProgramItem {
        ProgramItem {
            name: self.title.clone(),
            overview: self.description.clone(),
            premiere_date: self.start_date,
            production_year: self.start_date.map(|d| d.year()),
            genres: self.genres.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// Library item fields populated from program metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramItem {
    pub name: Option<String>,
    pub overview: Option<String>,
    pub premiere_date: Option<NaiveDateTime>,
    pub production_year: Option<i32>,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
}

/// Result handed back to the library for one file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataResult {
    pub has_metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<ProgramItem>,
}

impl MetadataResult {
    pub fn empty() -> Self {
        Self::default()
    }
}

impl From<Option<NormalizedMetadata>> for MetadataResult {
    fn from(metadata: Option<NormalizedMetadata>) -> Self {
        match metadata {
            Some(m) => Self {
                has_metadata: true,
                item: Some(m.to_item()),
            },
            None => Self::empty(),
        }
    }
}
