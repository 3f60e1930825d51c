use serde::{Deserialize, Serialize};

/// Catalog value meaning "not available".
pub const NOT_AVAILABLE: &str = "N/A";

/// One entry of the output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub title: String,
    pub year: String,
    pub genre: String,
    pub plot: String,
    /// Poster URL, or [`NOT_AVAILABLE`].
    pub poster: String,
    pub filename: String,
    pub filepath: String,
    /// Base64 of the raw pixel bytes of the downsized poster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl MetadataRecord {
    pub fn has_poster(&self) -> bool {
        self.poster != NOT_AVAILABLE
    }
}

/// Fields the catalog returns for a found title.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Genre")]
    pub genre: String,
    #[serde(rename = "Plot")]
    pub plot: String,
    #[serde(rename = "Poster")]
    pub poster: String,
}

impl CatalogEntry {
    pub fn into_record(self, filename: &str, filepath: &str) -> MetadataRecord {
        MetadataRecord {
            title: self.title,
            year: self.year,
            genre: self.genre,
            plot: self.plot,
            poster: self.poster,
            filename: filename.to_string(),
            filepath: filepath.to_string(),
            thumbnail: None,
        }
    }
}
