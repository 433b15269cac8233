//! Bookmarked-bit toggle state.
//!
//! Remembers which bits the user bookmarked and which local bookmark mirrors
//! each one, so un-toggling removes exactly that bookmark by id.

use crate::types::bit::BookmarkedBit;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitToggleManager {
    entries: Vec<BookmarkedBit>,
}

impl BitToggleManager {
    pub fn new(entries: Vec<BookmarkedBit>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[BookmarkedBit] {
        &self.entries
    }

    pub fn is_bookmarked(&self, bit_id: &str) -> bool {
        self.entries.iter().any(|e| e.bit_id == bit_id)
    }

    pub fn bookmark_id_for(&self, bit_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.bit_id == bit_id)
            .map(|e| e.bookmark_id.as_str())
    }

    pub fn record(&mut self, bit_id: &str, bookmark_id: &str) {
        self.forget(bit_id);
        self.entries.push(BookmarkedBit {
            bit_id: bit_id.to_string(),
            bookmark_id: bookmark_id.to_string(),
        });
    }

    /// Returns the mirrored bookmark id of the forgotten bit.
    pub fn forget(&mut self, bit_id: &str) -> Option<String> {
        let pos = self.entries.iter().position(|e| e.bit_id == bit_id)?;
        Some(self.entries.remove(pos).bookmark_id)
    }

    /// Drops entries whose bookmark no longer exists. Returns true if any were dropped.
    pub fn retain_existing(&mut self, exists: impl Fn(&str) -> bool) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| exists(&e.bookmark_id));
        self.entries.len() != before
    }
}
