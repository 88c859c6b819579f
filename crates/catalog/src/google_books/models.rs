//! Volumes search response models.
//!
//! Only the fields the book finder shows are mapped. Any of them may be
//! missing or `null`, so everything is optional.

use serde::Deserialize;

/// Response wrapper for the volumes search
#[derive(Debug, Deserialize)]
pub struct VolumesResponse {
    pub items: Option<Vec<Volume>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub volume_info: Option<VolumeInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub authors: Option<Vec<String>>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    pub categories: Option<Vec<String>>,
    pub page_count: Option<u32>,
    pub language: Option<String>,
    pub industry_identifiers: Option<Vec<IndustryIdentifier>>,
    pub image_links: Option<ImageLinks>,
    pub info_link: Option<String>,
    // Note: previewLink, canonicalVolumeLink and ratings exist but are not shown
}

/// ISBN or other identifier, e.g. `{"type": "ISBN_13", "identifier": "978..."}`
#[derive(Debug, Deserialize)]
pub struct IndustryIdentifier {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub identifier: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub thumbnail: Option<String>,
    pub small_thumbnail: Option<String>,
}
