//! # Book Data Model
//!
//! Decoded representations of Google Books API payloads, plus the
//! per-field default rules used when rendering search results and
//! book details. API responses are decoded once at the client
//! boundary; the rest of the bot only ever sees these types.

use serde::Deserialize;

/// Maximum description length before truncation, in characters
pub const DESCRIPTION_LIMIT: usize = 1000;
/// Marker appended to a truncated description
pub const TRUNCATION_MARKER: &str = "...";

// Placeholder strings substituted for missing fields
pub const UNKNOWN_TITLE: &str = "Без названия";
pub const UNKNOWN_AUTHOR: &str = "Неизвестен";
pub const UNKNOWN_PUBLISHER: &str = "Неизвестно";
pub const UNKNOWN_DATE: &str = "Неизвестно";
pub const NO_DESCRIPTION: &str = "Нет описания";

/// Response payload of a volumes search request
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub total_items: i64,
    #[serde(default)]
    pub items: Vec<Volume>,
}

/// A single volume record as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub volume_info: VolumeInfo,
}

/// Nested volume information; every field may be absent
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    pub page_count: Option<i64>,
    pub average_rating: Option<f64>,
    pub ratings_count: Option<i64>,
    pub industry_identifiers: Option<Vec<IndustryIdentifier>>,
    pub image_links: Option<ImageLinks>,
    pub info_link: Option<String>,
}

/// An industry identifier entry (ISBN_10, ISBN_13, OTHER, ...)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IndustryIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub identifier: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub thumbnail: Option<String>,
}

/// Condensed listing-row representation of a search hit
#[derive(Debug, Clone, PartialEq)]
pub struct BookSummary {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    /// First four characters of the published date, when present
    pub published_year: Option<String>,
}

impl BookSummary {
    pub fn from_volume(volume: &Volume) -> Self {
        let info = &volume.volume_info;

        Self {
            id: volume.id.clone(),
            title: info
                .title
                .clone()
                .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            authors: info
                .authors
                .clone()
                .unwrap_or_else(|| vec![UNKNOWN_AUTHOR.to_string()]),
            published_year: published_year(info.published_date.as_deref()),
        }
    }
}

/// Fully expanded single-book representation
#[derive(Debug, Clone, PartialEq)]
pub struct BookDetail {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub publisher: String,
    pub published_date: String,
    pub description: String,
    pub thumbnail: Option<String>,
    pub average_rating: Option<f64>,
    pub ratings_count: i64,
    pub page_count: Option<i64>,
    pub isbn: Option<String>,
    /// Outbound Google Books link; may be empty
    pub info_link: String,
}

impl BookDetail {
    /// Build a detail record, substituting placeholders field by field
    /// so a partially populated volume never fails the render.
    pub fn from_volume(volume: &Volume) -> Self {
        let info = &volume.volume_info;

        Self {
            id: volume.id.clone(),
            title: info
                .title
                .clone()
                .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            authors: info
                .authors
                .clone()
                .unwrap_or_else(|| vec![UNKNOWN_AUTHOR.to_string()]),
            publisher: info
                .publisher
                .clone()
                .unwrap_or_else(|| UNKNOWN_PUBLISHER.to_string()),
            published_date: info
                .published_date
                .clone()
                .unwrap_or_else(|| UNKNOWN_DATE.to_string()),
            description: truncate_description(
                info.description.as_deref().unwrap_or(NO_DESCRIPTION),
            ),
            thumbnail: info
                .image_links
                .as_ref()
                .and_then(|links| links.thumbnail.clone()),
            average_rating: info.average_rating,
            ratings_count: info.ratings_count.unwrap_or(0),
            page_count: info.page_count,
            isbn: select_isbn(info.industry_identifiers.as_deref().unwrap_or(&[])),
            info_link: info.info_link.clone().unwrap_or_default(),
        }
    }
}

/// Extract the 4-character year prefix from a published date
fn published_year(published_date: Option<&str>) -> Option<String> {
    let date = published_date?;
    if date.is_empty() {
        return None;
    }
    Some(date.chars().take(4).collect())
}

/// Truncate a description to `DESCRIPTION_LIMIT` characters, appending
/// the truncation marker. Already-truncated input is returned unchanged
/// so the marker is never doubled.
pub fn truncate_description(text: &str) -> String {
    if let Some(body) = text.strip_suffix(TRUNCATION_MARKER) {
        if body.chars().count() == DESCRIPTION_LIMIT {
            return text.to_string();
        }
    }

    if text.chars().count() <= DESCRIPTION_LIMIT {
        return text.to_string();
    }

    let mut truncated: String = text.chars().take(DESCRIPTION_LIMIT).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

/// Select the first ISBN_10 or ISBN_13 identifier in original order
pub fn select_isbn(identifiers: &[IndustryIdentifier]) -> Option<String> {
    identifiers
        .iter()
        .find(|identifier| identifier.kind == "ISBN_10" || identifier.kind == "ISBN_13")
        .map(|identifier| identifier.identifier.clone())
}
