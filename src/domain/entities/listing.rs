//! # Listing Read Model
//!
//! A marketplace listing as seen by the trade engine.
//!
//! Listing CRUD is owned by an external collaborator; this crate only reads
//! the fields settlement needs: who owns the listing and which direction the
//! hours flow.

use crate::domain::value_objects::{AccountId, ListingId, ListingKind};
use serde::{Deserialize, Serialize};

/// A marketplace listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// The listing identifier.
    id: ListingId,
    /// The account that owns the listing.
    owner: AccountId,
    /// Whether the owner offers or requests time.
    kind: ListingKind,
    /// Listing title, used in ledger memos.
    title: String,
}

impl Listing {
    /// Creates a new listing read model.
    #[must_use]
    pub fn new(
        id: ListingId,
        owner: AccountId,
        kind: ListingKind,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id,
            owner,
            kind,
            title: title.into(),
        }
    }

    /// Returns the listing ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ListingId {
        self.id
    }

    /// Returns the owning account.
    #[inline]
    #[must_use]
    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    /// Returns the listing kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ListingKind {
        self.kind
    }

    /// Returns the listing title.
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}
