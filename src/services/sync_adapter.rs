//! Boundary between remote entity shapes and the local bookmark tree.
//!
//! Everything arriving from the remote data service goes through a
//! [`SyncAdapter`], so the tree never special-cases where an entity came from.

use std::collections::BTreeSet;

use crate::types::bit::BitRecord;
use crate::types::bookmark::NewBookmark;
use crate::types::errors::BookmarkError;

/// Remote data service as seen by the core: request/response only.
pub trait RemoteDataService {
    type Error: std::error::Error;

    fn fetch_bits(&self, user_id: &str) -> Result<Vec<BitRecord>, Self::Error>;
}

/// Translates an external record into a local bookmark and back.
pub trait SyncAdapter {
    type Remote;

    fn to_local(&self, remote: &Self::Remote) -> Result<NewBookmark, BookmarkError>;
    /// Stable id of the remote record the bookmark was created from.
    fn remote_id<'a>(&self, remote: &'a Self::Remote) -> &'a str;
}

/// Maps bits onto bookmarks pointing at the bit's page.
#[derive(Debug, Clone)]
pub struct BitSyncAdapter {
    /// Used when a bit has no source URL of its own.
    pub bit_url_base: String,
}

impl Default for BitSyncAdapter {
    fn default() -> Self {
        Self {
            bit_url_base: "https://wdylt.app/bits/".to_string(),
        }
    }
}

impl SyncAdapter for BitSyncAdapter {
    type Remote = BitRecord;

    fn to_local(&self, bit: &BitRecord) -> Result<NewBookmark, BookmarkError> {
        if bit.id.trim().is_empty() {
            return Err(BookmarkError::Validation("bit id must not be empty".to_string()));
        }
        let url = match bit.source_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => format!("{}{}", self.bit_url_base, bit.id),
        };
        let title = if bit.title.trim().is_empty() {
            format!("Bit {}", bit.id)
        } else {
            bit.title.clone()
        };
        let description = Some(bit.content.trim())
            .filter(|c| !c.is_empty())
            .map(|c| c.chars().take(280).collect::<String>());
        let tags: BTreeSet<String> = bit.tags.iter().map(|t| t.trim().to_lowercase()).filter(|t| !t.is_empty()).collect();

        Ok(NewBookmark {
            title,
            url,
            description,
            icon: None,
            tags: (!tags.is_empty()).then_some(tags),
        })
    }

    fn remote_id<'a>(&self, bit: &'a BitRecord) -> &'a str {
        &bit.id
    }
}
