//! # Trade Aggregate
//!
//! A bilateral trade negotiation over a marketplace listing.
//!
//! This module provides the [`Trade`] aggregate: one party proposes a price
//! and a number of hours against a listing, both parties accept or reject,
//! and on mutual acceptance the trade settles and completes.
//!
//! # Lifecycle
//!
//! ```text
//! PENDING → REJECTED | COMPLETED | CANCELLED
//! ```
//!
//! # Examples
//!
//! ```
//! use time_market::domain::entities::trade::{Trade, TradeParty};
//! use time_market::domain::value_objects::{Amount, AccountId, Hours, ListingId};
//!
//! let mut trade = Trade::new(
//!     ListingId::new_v4(),
//!     AccountId::new("alice"),
//!     AccountId::new("bob"),
//!     Amount::new(15_000.0).unwrap(),
//!     Hours::new(2.5).unwrap(),
//!     None,
//! )
//! .unwrap();
//!
//! trade.accept(TradeParty::Proposer).unwrap();
//! trade.accept(TradeParty::Counterparty).unwrap();
//! assert!(trade.both_accepted());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{AccountId, Amount, Hours, ListingId, TradeId, TradeStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two roles in a trade negotiation.
///
/// The proposer initiated the trade against a listing; the counterparty is
/// the listing owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeParty {
    /// The account that proposed the trade.
    Proposer,

    /// The listing owner the trade was proposed to.
    Counterparty,
}

impl TradeParty {
    /// Returns the opposite party.
    #[inline]
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Proposer => Self::Counterparty,
            Self::Counterparty => Self::Proposer,
        }
    }
}

impl fmt::Display for TradeParty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Proposer => "PROPOSER",
            Self::Counterparty => "COUNTERPARTY",
        };
        write!(f, "{}", s)
    }
}

/// A bilateral trade negotiation.
///
/// # Invariants
///
/// - Only `PENDING` trades mutate; terminal trades refuse every transition
///   with [`DomainError::AlreadyFinalized`]
/// - Acceptance flags are monotonic: accepting twice is a no-op, and no
///   operation ever lowers a set flag
/// - `amount` is informational; settlement moves `hours`
/// - `0 < amount <= 99,999,999.99` and `0 < hours <= 999.99` at creation
///
/// # Examples
///
/// ```
/// use time_market::domain::entities::trade::{Trade, TradeParty};
/// use time_market::domain::value_objects::{Amount, AccountId, Hours, ListingId};
///
/// let mut trade = Trade::new(
///     ListingId::new_v4(),
///     AccountId::new("alice"),
///     AccountId::new("bob"),
///     Amount::new(100.0).unwrap(),
///     Hours::new(3.0).unwrap(),
///     Some("weekend ok".to_string()),
/// )
/// .unwrap();
///
/// trade.reject(TradeParty::Counterparty).unwrap();
/// assert!(trade.status().is_terminal());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Unique identifier for this trade.
    id: TradeId,
    /// The listing this trade was proposed against.
    listing_id: ListingId,
    /// The account that proposed the trade.
    proposer: AccountId,
    /// The listing owner.
    counterparty: AccountId,
    /// Proposed monetary amount (informational only).
    amount: Amount,
    /// Hours to settle on completion.
    hours: Hours,
    /// Free-text note from the proposer.
    note: Option<String>,
    /// Current lifecycle status.
    status: TradeStatus,
    /// Whether the proposer has accepted.
    proposer_accepted: bool,
    /// Whether the counterparty has accepted.
    counterparty_accepted: bool,
    /// Why the trade was rejected, when settlement rejected it.
    failure_reason: Option<String>,
    /// Version for optimistic locking.
    version: u64,
    /// When this trade was created.
    created_at: Timestamp,
    /// When this trade was last updated.
    updated_at: Timestamp,
}

impl Trade {
    /// Creates a new pending trade.
    ///
    /// # Arguments
    ///
    /// * `listing_id` - The listing the trade is proposed against
    /// * `proposer` - The account proposing the trade
    /// * `counterparty` - The listing owner
    /// * `amount` - The proposed monetary amount
    /// * `hours` - The hours that settle on completion
    /// * `note` - Optional free-text note
    ///
    /// # Errors
    ///
    /// - [`DomainError::SelfTrade`] if proposer and counterparty are the same account
    /// - [`DomainError::InvalidAmount`] if the amount is zero or above the cap
    /// - [`DomainError::InvalidHours`] if the hours are zero or above the cap
    pub fn new(
        listing_id: ListingId,
        proposer: AccountId,
        counterparty: AccountId,
        amount: Amount,
        hours: Hours,
        note: Option<String>,
    ) -> DomainResult<Self> {
        if proposer == counterparty {
            return Err(DomainError::SelfTrade(proposer.to_string()));
        }
        if !amount.is_positive() {
            return Err(DomainError::InvalidAmount(
                "amount must be positive".to_string(),
            ));
        }
        if amount.exceeds_trade_cap() {
            return Err(DomainError::InvalidAmount(format!(
                "amount {} exceeds maximum {}",
                amount,
                Amount::MAX_PER_TRADE
            )));
        }
        if !hours.is_positive() {
            return Err(DomainError::InvalidHours(
                "hours must be positive".to_string(),
            ));
        }
        if hours.exceeds_trade_cap() {
            return Err(DomainError::InvalidHours(format!(
                "hours {} exceeds maximum {}",
                hours,
                Hours::MAX_PER_TRADE
            )));
        }

        let now = Timestamp::now();
        Ok(Self {
            id: TradeId::new_v4(),
            listing_id,
            proposer,
            counterparty,
            amount,
            hours,
            note,
            status: TradeStatus::Pending,
            proposer_accepted: false,
            counterparty_accepted: false,
            failure_reason: None,
            version: 1,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstructs a trade from stored fields.
    ///
    /// Bypasses creation validation; only for rehydrating from trusted
    /// storage.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: TradeId,
        listing_id: ListingId,
        proposer: AccountId,
        counterparty: AccountId,
        amount: Amount,
        hours: Hours,
        note: Option<String>,
        status: TradeStatus,
        proposer_accepted: bool,
        counterparty_accepted: bool,
        failure_reason: Option<String>,
        version: u64,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            listing_id,
            proposer,
            counterparty,
            amount,
            hours,
            note,
            status,
            proposer_accepted,
            counterparty_accepted,
            failure_reason,
            version,
            created_at,
            updated_at,
        }
    }

    fn transition_to(&mut self, target: TradeStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::InvalidStateTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
        self.version = self.version.saturating_add(1);
    }

    fn ensure_open(&self) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(DomainError::AlreadyFinalized {
                status: self.status,
            });
        }
        Ok(())
    }

    // ========== Transitions ==========

    /// Records an acceptance by the given party.
    ///
    /// Flags are monotonic: accepting an already-accepted side is a no-op
    /// and returns `false`. The trade stays `PENDING`; when
    /// [`Trade::both_accepted`] turns true the caller must settle and
    /// [`Trade::complete`] within the same lock scope.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::AlreadyFinalized`] if the trade is terminal.
    pub fn accept(&mut self, party: TradeParty) -> DomainResult<bool> {
        self.ensure_open()?;
        let flag = match party {
            TradeParty::Proposer => &mut self.proposer_accepted,
            TradeParty::Counterparty => &mut self.counterparty_accepted,
        };
        if *flag {
            return Ok(false);
        }
        *flag = true;
        self.touch();
        Ok(true)
    }

    /// Records a rejection by the given party and finalizes the trade.
    ///
    /// Rejection is immediate: one decline ends the negotiation regardless of
    /// the other party's flag.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::AlreadyFinalized`] if the trade is terminal.
    pub fn reject(&mut self, party: TradeParty) -> DomainResult<()> {
        self.ensure_open()?;
        self.transition_to(TradeStatus::Rejected)?;
        self.failure_reason = Some(format!("rejected by {}", party));
        Ok(())
    }

    /// Completes the trade after successful settlement.
    ///
    /// # Errors
    ///
    /// - [`DomainError::AlreadyFinalized`] if the trade is terminal
    /// - [`DomainError::InvalidStateTransition`] if both parties have not accepted
    pub fn complete(&mut self) -> DomainResult<()> {
        self.ensure_open()?;
        if !self.both_accepted() {
            return Err(DomainError::InvalidStateTransition {
                from: self.status,
                to: TradeStatus::Completed,
            });
        }
        self.transition_to(TradeStatus::Completed)
    }

    /// Forces the trade to `REJECTED` with a failure reason.
    ///
    /// Used when settlement cannot complete: the trade must not stay
    /// `PENDING` once a settlement attempt has failed.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::AlreadyFinalized`] if the trade is terminal.
    pub fn mark_rejected(&mut self, reason: impl Into<String>) -> DomainResult<()> {
        self.ensure_open()?;
        self.transition_to(TradeStatus::Rejected)?;
        self.failure_reason = Some(reason.into());
        Ok(())
    }

    /// Withdraws the trade.
    ///
    /// Only the proposer may cancel.
    ///
    /// # Errors
    ///
    /// - [`DomainError::Forbidden`] if a non-proposer attempts the withdrawal
    /// - [`DomainError::AlreadyFinalized`] if the trade is terminal
    pub fn cancel(&mut self, party: TradeParty) -> DomainResult<()> {
        if party != TradeParty::Proposer {
            return Err(DomainError::Forbidden(
                "only the proposer may cancel a trade".to_string(),
            ));
        }
        self.ensure_open()?;
        self.transition_to(TradeStatus::Cancelled)
    }

    // ========== Queries ==========

    /// Resolves which party an account is, if it participates in this trade.
    #[must_use]
    pub fn party_of(&self, account: &AccountId) -> Option<TradeParty> {
        if *account == self.proposer {
            Some(TradeParty::Proposer)
        } else if *account == self.counterparty {
            Some(TradeParty::Counterparty)
        } else {
            None
        }
    }

    /// Returns the account playing the given party role.
    #[must_use]
    pub fn account_of(&self, party: TradeParty) -> &AccountId {
        match party {
            TradeParty::Proposer => &self.proposer,
            TradeParty::Counterparty => &self.counterparty,
        }
    }

    /// Returns true if both parties have accepted.
    #[inline]
    #[must_use]
    pub fn both_accepted(&self) -> bool {
        self.proposer_accepted && self.counterparty_accepted
    }

    /// Returns true if the trade is still pending.
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == TradeStatus::Pending
    }

    // ========== Accessors ==========

    /// Returns the trade ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> TradeId {
        self.id
    }

    /// Returns the listing ID.
    #[inline]
    #[must_use]
    pub fn listing_id(&self) -> ListingId {
        self.listing_id
    }

    /// Returns the proposer's account ID.
    #[inline]
    #[must_use]
    pub fn proposer(&self) -> &AccountId {
        &self.proposer
    }

    /// Returns the counterparty's account ID.
    #[inline]
    #[must_use]
    pub fn counterparty(&self) -> &AccountId {
        &self.counterparty
    }

    /// Returns the proposed monetary amount.
    #[inline]
    #[must_use]
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Returns the hours that settle on completion.
    #[inline]
    #[must_use]
    pub fn hours(&self) -> Hours {
        self.hours
    }

    /// Returns the proposer's note, if any.
    #[inline]
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Returns the current lifecycle status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> TradeStatus {
        self.status
    }

    /// Returns true if the proposer has accepted.
    #[inline]
    #[must_use]
    pub fn proposer_accepted(&self) -> bool {
        self.proposer_accepted
    }

    /// Returns true if the counterparty has accepted.
    #[inline]
    #[must_use]
    pub fn counterparty_accepted(&self) -> bool {
        self.counterparty_accepted
    }

    /// Returns the failure reason, if any.
    #[inline]
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    /// Returns the version for optimistic locking.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns when this trade was created.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when this trade was last updated.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pending_trade() -> Trade {
        Trade::new(
            ListingId::new_v4(),
            AccountId::new("alice"),
            AccountId::new("bob"),
            Amount::new(100.0).unwrap(),
            Hours::new(3.0).unwrap(),
            None,
        )
        .unwrap()
    }

    mod construction {
        use super::*;

        #[test]
        fn new_trade_is_pending() {
            let trade = pending_trade();
            assert_eq!(trade.status(), TradeStatus::Pending);
            assert!(!trade.proposer_accepted());
            assert!(!trade.counterparty_accepted());
            assert_eq!(trade.version(), 1);
        }

        #[test]
        fn self_trade_rejected() {
            let result = Trade::new(
                ListingId::new_v4(),
                AccountId::new("alice"),
                AccountId::new("alice"),
                Amount::new(100.0).unwrap(),
                Hours::new(3.0).unwrap(),
                None,
            );
            assert!(matches!(result, Err(DomainError::SelfTrade(_))));
        }

        #[test]
        fn zero_amount_rejected() {
            let result = Trade::new(
                ListingId::new_v4(),
                AccountId::new("alice"),
                AccountId::new("bob"),
                Amount::ZERO,
                Hours::new(3.0).unwrap(),
                None,
            );
            assert!(matches!(result, Err(DomainError::InvalidAmount(_))));
        }

        #[test]
        fn amount_above_cap_rejected() {
            let result = Trade::new(
                ListingId::new_v4(),
                AccountId::new("alice"),
                AccountId::new("bob"),
                Amount::new(100_000_000.0).unwrap(),
                Hours::new(3.0).unwrap(),
                None,
            );
            assert!(matches!(result, Err(DomainError::InvalidAmount(_))));
        }

        #[test]
        fn zero_hours_rejected() {
            let result = Trade::new(
                ListingId::new_v4(),
                AccountId::new("alice"),
                AccountId::new("bob"),
                Amount::new(100.0).unwrap(),
                Hours::ZERO,
                None,
            );
            assert!(matches!(result, Err(DomainError::InvalidHours(_))));
        }

        #[test]
        fn hours_above_cap_rejected() {
            let result = Trade::new(
                ListingId::new_v4(),
                AccountId::new("alice"),
                AccountId::new("bob"),
                Amount::new(100.0).unwrap(),
                Hours::new(1000.0).unwrap(),
                None,
            );
            assert!(matches!(result, Err(DomainError::InvalidHours(_))));
        }

        #[test]
        fn hours_at_cap_accepted() {
            let result = Trade::new(
                ListingId::new_v4(),
                AccountId::new("alice"),
                AccountId::new("bob"),
                Amount::new(100.0).unwrap(),
                Hours::new(999.99).unwrap(),
                None,
            );
            assert!(result.is_ok());
        }
    }

    mod acceptance {
        use super::*;

        #[test]
        fn accept_sets_flag_and_bumps_version() {
            let mut trade = pending_trade();
            trade.accept(TradeParty::Proposer).unwrap();
            assert!(trade.proposer_accepted());
            assert!(!trade.counterparty_accepted());
            assert_eq!(trade.version(), 2);
            assert!(trade.is_pending());
        }

        #[test]
        fn accept_twice_is_noop() {
            let mut trade = pending_trade();
            assert!(trade.accept(TradeParty::Proposer).unwrap());
            let version = trade.version();
            assert!(!trade.accept(TradeParty::Proposer).unwrap());
            assert_eq!(trade.version(), version);
        }

        #[test]
        fn both_accepted_after_both_accept() {
            let mut trade = pending_trade();
            trade.accept(TradeParty::Proposer).unwrap();
            trade.accept(TradeParty::Counterparty).unwrap();
            assert!(trade.both_accepted());
            assert!(trade.is_pending());
        }

        #[test]
        fn accept_on_terminal_is_already_finalized() {
            let mut trade = pending_trade();
            trade.reject(TradeParty::Counterparty).unwrap();
            let result = trade.accept(TradeParty::Proposer);
            assert_eq!(
                result,
                Err(DomainError::AlreadyFinalized {
                    status: TradeStatus::Rejected
                })
            );
        }
    }

    mod rejection {
        use super::*;

        #[test]
        fn reject_is_immediate_and_terminal() {
            let mut trade = pending_trade();
            trade.accept(TradeParty::Proposer).unwrap();
            trade.reject(TradeParty::Counterparty).unwrap();
            assert_eq!(trade.status(), TradeStatus::Rejected);
            // acceptance flag is never lowered
            assert!(trade.proposer_accepted());
        }

        #[test]
        fn reject_records_reason() {
            let mut trade = pending_trade();
            trade.reject(TradeParty::Counterparty).unwrap();
            assert_eq!(trade.failure_reason(), Some("rejected by COUNTERPARTY"));
        }

        #[test]
        fn reject_on_terminal_is_already_finalized() {
            let mut trade = pending_trade();
            trade.reject(TradeParty::Proposer).unwrap();
            let result = trade.reject(TradeParty::Counterparty);
            assert!(matches!(
                result,
                Err(DomainError::AlreadyFinalized { .. })
            ));
        }
    }

    mod completion {
        use super::*;

        #[test]
        fn complete_requires_both_accepts() {
            let mut trade = pending_trade();
            trade.accept(TradeParty::Proposer).unwrap();
            let result = trade.complete();
            assert!(matches!(
                result,
                Err(DomainError::InvalidStateTransition { .. })
            ));
        }

        #[test]
        fn complete_after_both_accepts() {
            let mut trade = pending_trade();
            trade.accept(TradeParty::Proposer).unwrap();
            trade.accept(TradeParty::Counterparty).unwrap();
            trade.complete().unwrap();
            assert_eq!(trade.status(), TradeStatus::Completed);
        }

        #[test]
        fn complete_on_terminal_is_already_finalized() {
            let mut trade = pending_trade();
            trade.accept(TradeParty::Proposer).unwrap();
            trade.accept(TradeParty::Counterparty).unwrap();
            trade.complete().unwrap();
            assert!(matches!(
                trade.complete(),
                Err(DomainError::AlreadyFinalized { .. })
            ));
        }
    }

    mod settlement_rollback {
        use super::*;

        #[test]
        fn mark_rejected_records_reason() {
            let mut trade = pending_trade();
            trade.accept(TradeParty::Proposer).unwrap();
            trade.accept(TradeParty::Counterparty).unwrap();
            trade
                .mark_rejected("insufficient balance: needed 3, had 0")
                .unwrap();
            assert_eq!(trade.status(), TradeStatus::Rejected);
            assert_eq!(
                trade.failure_reason(),
                Some("insufficient balance: needed 3, had 0")
            );
        }
    }

    mod cancellation {
        use super::*;

        #[test]
        fn proposer_can_cancel() {
            let mut trade = pending_trade();
            trade.cancel(TradeParty::Proposer).unwrap();
            assert_eq!(trade.status(), TradeStatus::Cancelled);
        }

        #[test]
        fn counterparty_cannot_cancel() {
            let mut trade = pending_trade();
            let result = trade.cancel(TradeParty::Counterparty);
            assert!(matches!(result, Err(DomainError::Forbidden(_))));
            assert!(trade.is_pending());
        }
    }

    mod parties {
        use super::*;

        #[test]
        fn party_of_resolves_participants() {
            let trade = pending_trade();
            assert_eq!(
                trade.party_of(&AccountId::new("alice")),
                Some(TradeParty::Proposer)
            );
            assert_eq!(
                trade.party_of(&AccountId::new("bob")),
                Some(TradeParty::Counterparty)
            );
            assert_eq!(trade.party_of(&AccountId::new("mallory")), None);
        }

        #[test]
        fn account_of_maps_roles() {
            let trade = pending_trade();
            assert_eq!(
                trade.account_of(TradeParty::Proposer),
                &AccountId::new("alice")
            );
            assert_eq!(
                trade.account_of(TradeParty::Counterparty),
                &AccountId::new("bob")
            );
        }

        #[test]
        fn other_party_flips() {
            assert_eq!(TradeParty::Proposer.other(), TradeParty::Counterparty);
            assert_eq!(TradeParty::Counterparty.other(), TradeParty::Proposer);
        }
    }

    mod serde {
        use super::*;

        #[test]
        fn serde_roundtrip() {
            let trade = pending_trade();
            let json = serde_json::to_string(&trade).unwrap();
            let deserialized: Trade = serde_json::from_str(&json).unwrap();
            assert_eq!(trade, deserialized);
        }
    }
}
