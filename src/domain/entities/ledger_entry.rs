//! # Ledger Entry Entity
//!
//! One immutable row in the append-only wallet ledger.
//!
//! Every settlement writes exactly two entries: a debit against the payer and
//! a credit to the payee. Entries are never updated or deleted; the sum of an
//! account's signed entries always equals its stored balance.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{AccountId, EntryId, Hours, TradeId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryDirection {
    /// Hours added to the account.
    Credit,

    /// Hours removed from the account.
    Debit,
}

impl fmt::Display for EntryDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Credit => "CREDIT",
            Self::Debit => "DEBIT",
        };
        write!(f, "{}", s)
    }
}

/// An immutable ledger entry.
///
/// # Invariants
///
/// - `hours` is strictly positive; the direction carries the sign
/// - Entries reference the trade that produced them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier for this entry.
    id: EntryId,
    /// The account this entry applies to.
    account_id: AccountId,
    /// Credit or debit.
    direction: EntryDirection,
    /// Hours moved (always positive).
    hours: Hours,
    /// Human-readable description of the movement.
    memo: String,
    /// The trade that produced this entry.
    trade_id: TradeId,
    /// When the entry was written.
    created_at: Timestamp,
}

impl LedgerEntry {
    /// Creates a new ledger entry.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidHours`] if `hours` is zero.
    pub fn new(
        account_id: AccountId,
        direction: EntryDirection,
        hours: Hours,
        memo: impl Into<String>,
        trade_id: TradeId,
    ) -> DomainResult<Self> {
        if !hours.is_positive() {
            return Err(DomainError::InvalidHours(
                "ledger entry hours must be positive".to_string(),
            ));
        }
        Ok(Self {
            id: EntryId::new_v4(),
            account_id,
            direction,
            hours,
            memo: memo.into(),
            trade_id,
            created_at: Timestamp::now(),
        })
    }

    /// Returns the hours with the direction applied as a sign.
    ///
    /// Credits are positive, debits negative. Summing signed values per
    /// account reproduces the account balance.
    #[must_use]
    pub fn signed_hours(&self) -> Decimal {
        match self.direction {
            EntryDirection::Credit => self.hours.get(),
            EntryDirection::Debit => -self.hours.get(),
        }
    }

    /// Returns the entry ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Returns the account this entry applies to.
    #[inline]
    #[must_use]
    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    /// Returns the entry direction.
    #[inline]
    #[must_use]
    pub fn direction(&self) -> EntryDirection {
        self.direction
    }

    /// Returns the hours moved.
    #[inline]
    #[must_use]
    pub fn hours(&self) -> Hours {
        self.hours
    }

    /// Returns the memo.
    #[inline]
    #[must_use]
    pub fn memo(&self) -> &str {
        &self.memo
    }

    /// Returns the trade that produced this entry.
    #[inline]
    #[must_use]
    pub fn trade_id(&self) -> TradeId {
        self.trade_id
    }

    /// Returns when the entry was written.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}
