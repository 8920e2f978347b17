//! # Listing Kind
//!
//! Direction of a marketplace listing.
//!
//! The kind determines the direction hours flow at settlement:
//!
//! - `OFFER`: the owner offers their time; the proposer pays the owner.
//! - `REQUEST`: the owner requests someone's time; the owner pays the proposer.
//!
//! The enum is closed. Listing data arrives from an external collaborator, so
//! boundary code parses kinds with [`FromStr`]; an unrecognized tag is a data
//! integrity error, never a silent default.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Direction of a marketplace listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingKind {
    /// The listing owner offers their time for sale.
    Offer,

    /// The listing owner requests someone else's time.
    Request,
}

impl ListingKind {
    /// Returns the kind name as used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Offer => "OFFER",
            Self::Request => "REQUEST",
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for unrecognized listing kind tags.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown listing kind: {tag}")]
pub struct ParseListingKindError {
    /// The rejected tag.
    pub tag: String,
}

impl FromStr for ListingKind {
    type Err = ParseListingKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OFFER" => Ok(Self::Offer),
            "REQUEST" => Ok(Self::Request),
            _ => Err(ParseListingKindError { tag: s.to_owned() }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn from_str_parses_known_kinds() {
        assert_eq!("OFFER".parse::<ListingKind>().unwrap(), ListingKind::Offer);
        assert_eq!(
            "request".parse::<ListingKind>().unwrap(),
            ListingKind::Request
        );
    }

    #[test]
    fn from_str_rejects_unknown_tag() {
        let result = "BARTER".parse::<ListingKind>();
        assert_eq!(
            result,
            Err(ParseListingKindError {
                tag: "BARTER".to_owned()
            })
        );
    }

    #[test]
    fn serde_roundtrip() {
        let json = serde_json::to_string(&ListingKind::Offer).unwrap();
        assert_eq!(json, "\"OFFER\"");
        let kind: ListingKind = serde_json::from_str("\"REQUEST\"").unwrap();
        assert_eq!(kind, ListingKind::Request);
    }

    #[test]
    fn display_matches_wire_format() {
        assert_eq!(ListingKind::Offer.to_string(), "OFFER");
        assert_eq!(ListingKind::Request.to_string(), "REQUEST");
    }
}
