//! # Identity Value Objects
//!
//! Type-safe identity wrappers for domain identifiers.
//!
//! This module provides newtype wrappers for all domain identifiers,
//! ensuring type safety and preventing accidental mixing of different ID types.
//!
//! ## UUID-based Identifiers
//!
//! - [`TradeId`] - Trade identifier
//! - [`ListingId`] - Listing identifier
//! - [`EntryId`] - Ledger entry identifier
//! - [`EventId`] - Domain event identifier
//!
//! ## String-based Identifiers
//!
//! - [`AccountId`] - Account (wallet owner) identifier

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Trade identifier.
///
/// A UUID-based identifier uniquely identifying a trade negotiation.
///
/// # Examples
///
/// ```
/// use time_market::domain::value_objects::ids::TradeId;
///
/// // Generate a new random trade ID
/// let trade_id = TradeId::new_v4();
///
/// // Display as hyphenated UUID
/// println!("Trade: {}", trade_id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(Uuid);

impl TradeId {
    /// Creates a new trade ID from an existing UUID.
    #[inline]
    #[must_use]
    pub const fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generates a new random trade ID using UUID v4.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> Uuid {
        self.0
    }

    /// Creates a trade ID from a UUID reference.
    #[inline]
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl From<Uuid> for TradeId {
    #[inline]
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Listing identifier.
///
/// A UUID-based identifier for the marketplace listing a trade is negotiated
/// against. Listings are owned by the marketplace collaborator; this crate
/// only reads them.
///
/// # Examples
///
/// ```
/// use time_market::domain::value_objects::ids::ListingId;
///
/// let listing_id = ListingId::new_v4();
/// println!("Listing: {}", listing_id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(Uuid);

impl ListingId {
    /// Creates a new listing ID from an existing UUID.
    #[inline]
    #[must_use]
    pub const fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generates a new random listing ID using UUID v4.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> Uuid {
        self.0
    }

    /// Creates a listing ID from a UUID reference.
    #[inline]
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl From<Uuid> for ListingId {
    #[inline]
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Ledger entry identifier.
///
/// A UUID-based identifier uniquely identifying one immutable ledger entry.
///
/// # Examples
///
/// ```
/// use time_market::domain::value_objects::ids::EntryId;
///
/// let entry_id = EntryId::new_v4();
/// println!("Entry: {}", entry_id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Creates a new entry ID from an existing UUID.
    #[inline]
    #[must_use]
    pub const fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generates a new random entry ID using UUID v4.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> Uuid {
        self.0
    }

    /// Creates an entry ID from a UUID reference.
    #[inline]
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl From<Uuid> for EntryId {
    #[inline]
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Domain event identifier.
///
/// A UUID-based identifier uniquely identifying a domain event for the
/// notification and audit trail.
///
/// # Examples
///
/// ```
/// use time_market::domain::value_objects::ids::EventId;
///
/// let event_id = EventId::new_v4();
/// println!("Event: {}", event_id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new event ID from an existing UUID.
    #[inline]
    #[must_use]
    pub const fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generates a new random event ID using UUID v4.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> Uuid {
        self.0
    }

    /// Creates an event ID from a UUID reference.
    #[inline]
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl From<Uuid> for EventId {
    #[inline]
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Account identifier.
///
/// A string-based identifier for wallet owners. Identity management is an
/// external collaborator, so account ids are opaque strings here.
///
/// # Examples
///
/// ```
/// use time_market::domain::value_objects::ids::AccountId;
///
/// let account_id = AccountId::new("alice");
/// assert_eq!(account_id.as_str(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Creates a new account ID from a string.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the account ID as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the AccountId and returns the inner String.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AccountId {
    #[inline]
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AccountId {
    #[inline]
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for AccountId {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}
