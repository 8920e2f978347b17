//! # In-Memory Listing Directory
//!
//! In-memory implementation of the [`ListingDirectory`] port.
//!
//! Rows are stored the way an external marketplace would hand them over:
//! the kind is a raw string tag parsed on every read, so a row written
//! with an unrecognized tag fails the lookup instead of defaulting.

use crate::application::use_cases::propose_trade::{ListingDirectory, ListingLookupError};
use crate::domain::entities::listing::Listing;
use crate::domain::value_objects::{AccountId, ListingId, ListingKind};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A stored listing row with its kind still in wire form.
#[derive(Debug, Clone)]
struct ListingRow {
    owner: AccountId,
    kind_tag: String,
    title: String,
}

/// In-memory implementation of [`ListingDirectory`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryListingDirectory {
    storage: Arc<RwLock<HashMap<ListingId, ListingRow>>>,
}

impl InMemoryListingDirectory {
    /// Creates a new empty listing directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a listing.
    pub async fn insert(&self, listing: Listing) {
        let row = ListingRow {
            owner: listing.owner().clone(),
            kind_tag: listing.kind().to_string(),
            title: listing.title().to_string(),
        };
        self.storage.write().await.insert(listing.id(), row);
    }

    /// Inserts a listing row with a raw kind tag, bypassing parsing.
    ///
    /// Mirrors data written by an external marketplace whose vocabulary
    /// may drift from ours.
    pub async fn insert_raw(
        &self,
        id: ListingId,
        owner: AccountId,
        kind_tag: impl Into<String>,
        title: impl Into<String>,
    ) {
        let row = ListingRow {
            owner,
            kind_tag: kind_tag.into(),
            title: title.into(),
        };
        self.storage.write().await.insert(id, row);
    }
}

#[async_trait]
impl ListingDirectory for InMemoryListingDirectory {
    async fn find(&self, id: ListingId) -> Result<Option<Listing>, ListingLookupError> {
        let storage = self.storage.read().await;
        let Some(row) = storage.get(&id) else {
            return Ok(None);
        };
        let kind: ListingKind = row
            .kind_tag
            .parse()
            .map_err(|_| ListingLookupError::InvalidKind(row.kind_tag.clone()))?;
        Ok(Some(Listing::new(
            id,
            row.owner.clone(),
            kind,
            row.title.clone(),
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn find_missing_returns_none() {
        let directory = InMemoryListingDirectory::new();
        let found = directory.find(ListingId::new_v4()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn insert_and_find_round_trips() {
        let directory = InMemoryListingDirectory::new();
        let listing = Listing::new(
            ListingId::new_v4(),
            AccountId::new("bob"),
            ListingKind::Request,
            "help moving",
        );
        directory.insert(listing.clone()).await;

        let found = directory.find(listing.id()).await.unwrap().unwrap();
        assert_eq!(found, listing);
    }

    #[tokio::test]
    async fn raw_tag_parses_case_insensitively() {
        let directory = InMemoryListingDirectory::new();
        let id = ListingId::new_v4();
        directory
            .insert_raw(id, AccountId::new("bob"), "offer", "gardening")
            .await;

        let found = directory.find(id).await.unwrap().unwrap();
        assert_eq!(found.kind(), ListingKind::Offer);
    }

    #[tokio::test]
    async fn unknown_kind_tag_fails_lookup() {
        let directory = InMemoryListingDirectory::new();
        let id = ListingId::new_v4();
        directory
            .insert_raw(id, AccountId::new("bob"), "BARTER", "gardening")
            .await;

        let result = directory.find(id).await;
        assert_eq!(
            result,
            Err(ListingLookupError::InvalidKind("BARTER".to_string()))
        );
    }
}
