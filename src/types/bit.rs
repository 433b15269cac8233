use serde::{Deserialize, Serialize};

/// A user-authored knowledge snippet as returned by the remote data service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Link the bit points at, if any.
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub author_id: Option<String>,
}

/// A bit the user has bookmarked, and the local bookmark mirroring it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkedBit {
    pub bit_id: String,
    pub bookmark_id: String,
}
