//! # Trade Status
//!
//! Lifecycle state machine for trade negotiations.
//!
//! ## State Machine
//!
//! ```text
//! PENDING ──> REJECTED    (a party declines, or settlement fails)
//!    │──────> COMPLETED   (both parties accept and settlement commits)
//!    └──────> CANCELLED   (proposer withdraws)
//! ```
//!
//! `ACCEPTED` exists in the domain vocabulary but no transition produces it;
//! a fully accepted trade settles and moves straight to `COMPLETED`.
//!
//! # Examples
//!
//! ```
//! use time_market::domain::value_objects::trade_status::TradeStatus;
//!
//! let status = TradeStatus::Pending;
//! assert!(status.can_transition_to(TradeStatus::Completed));
//! assert!(!TradeStatus::Rejected.can_transition_to(TradeStatus::Completed));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lifecycle status of a trade negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum TradeStatus {
    /// Awaiting responses from one or both parties.
    Pending = 0,

    /// Reserved vocabulary; no transition produces this status.
    Accepted = 1,

    /// A party declined, or settlement could not complete. Terminal.
    Rejected = 2,

    /// Both parties accepted and the hours settled. Terminal.
    Completed = 3,

    /// The proposer withdrew before resolution. Terminal.
    Cancelled = 4,
}

impl TradeStatus {
    /// Returns true if this status permits a transition to `target`.
    ///
    /// Only `PENDING` has outgoing transitions; terminal statuses permit none.
    #[inline]
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Pending,
                Self::Rejected | Self::Completed | Self::Cancelled
            )
        )
    }

    /// Returns true if this is a terminal status.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Completed | Self::Cancelled)
    }

    /// Returns the status name as used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for invalid trade status discriminants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid trade status value: {value}")]
pub struct InvalidTradeStatusError {
    /// The rejected discriminant.
    pub value: u8,
}

impl TryFrom<u8> for TradeStatus {
    type Error = InvalidTradeStatusError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Accepted),
            2 => Ok(Self::Rejected),
            3 => Ok(Self::Completed),
            4 => Ok(Self::Cancelled),
            _ => Err(InvalidTradeStatusError { value }),
        }
    }
}
