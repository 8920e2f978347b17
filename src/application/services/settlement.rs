//! # Settlement Engine
//!
//! Moves hours between wallets when a trade reaches mutual acceptance.
//!
//! The engine resolves the payment direction from the listing kind, runs the
//! defensive self-settlement check, and hands the [`Ledger`] port one atomic
//! [`TransferInstruction`]: funds check, debit, credit, and two ledger
//! entries commit together or not at all. The trade settles its `hours`
//! quantity; the monetary `amount` is never moved.

use crate::domain::entities::ledger_entry::LedgerEntry;
use crate::domain::entities::listing::Listing;
use crate::domain::entities::trade::Trade;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{AccountId, Hours, ListingKind, TradeId};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Error from the ledger port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The payer's balance does not cover the transfer.
    #[error("insufficient balance: needed {needed}, had {available}")]
    Insufficient {
        /// Hours the transfer requires.
        needed: Hours,
        /// Hours available in the payer's wallet.
        available: Hours,
    },

    /// The backing store failed.
    #[error("ledger storage error: {0}")]
    Storage(String),

    /// An account's entry history no longer sums to its balance.
    #[error("ledger audit mismatch for {account}: balance {balance}, entry sum {entry_sum}")]
    AuditMismatch {
        /// The account that diverged.
        account: AccountId,
        /// The stored balance.
        balance: String,
        /// The sum of signed entries.
        entry_sum: String,
    },
}

/// An atomic transfer of hours between two wallets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferInstruction {
    /// The trade driving the transfer.
    pub trade_id: TradeId,
    /// The account paying hours.
    pub payer: AccountId,
    /// The account receiving hours.
    pub payee: AccountId,
    /// Hours to move.
    pub hours: Hours,
    /// Memo written on both ledger entries.
    pub memo: String,
}

/// Proof of a committed transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    /// The debit entry written against the payer.
    pub debit: LedgerEntry,
    /// The credit entry written for the payee.
    pub credit: LedgerEntry,
}

/// Wallet ledger port.
///
/// `transfer` is the single atomic commit of the settlement: the funds
/// check, both balance mutations, and both ledger entries happen as one
/// unit. An adapter over SQL would take row locks in ascending account id
/// order inside one transaction; the in-memory adapter serializes through
/// one write lock.
#[async_trait]
pub trait Ledger: Send + Sync + fmt::Debug {
    /// Returns the balance of an account, zero if never touched.
    async fn balance_of(&self, account: &AccountId) -> Result<Hours, LedgerError>;

    /// Returns all ledger entries for an account, oldest first.
    async fn entries_for(&self, account: &AccountId) -> Result<Vec<LedgerEntry>, LedgerError>;

    /// Atomically moves hours from payer to payee.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Insufficient`] if the payer cannot cover the hours;
    ///   nothing is written
    /// - [`LedgerError::Storage`] on backing store failure
    async fn transfer(&self, instruction: TransferInstruction)
    -> Result<TransferReceipt, LedgerError>;

    /// Verifies that every account's balance equals the sum of its signed
    /// ledger entries.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AuditMismatch`] for the first diverging
    /// account found.
    async fn audit(&self) -> Result<(), LedgerError>;
}

/// Resolves which accounts pay and receive for a trade.
///
/// `OFFER` listings sell the owner's time, so the proposer pays the owner.
/// `REQUEST` listings buy someone's time, so the owner pays the proposer.
#[must_use]
pub fn payment_flow<'a>(
    kind: ListingKind,
    proposer: &'a AccountId,
    owner: &'a AccountId,
) -> (&'a AccountId, &'a AccountId) {
    match kind {
        ListingKind::Offer => (proposer, owner),
        ListingKind::Request => (owner, proposer),
    }
}

/// Settlement engine.
///
/// # Examples
///
/// ```rust,ignore
/// let engine = SettlementEngine::new(ledger);
/// let receipt = engine.settle(&trade, &listing).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SettlementEngine {
    ledger: Arc<dyn Ledger>,
}

impl SettlementEngine {
    /// Creates a new settlement engine over a ledger.
    #[must_use]
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self { ledger }
    }

    /// Returns the ledger this engine settles against.
    #[must_use]
    pub fn ledger(&self) -> &Arc<dyn Ledger> {
        &self.ledger
    }

    /// Settles a mutually accepted trade.
    ///
    /// Transfers the trade's hours between the parties in the direction the
    /// listing kind dictates. The caller holds the per-trade lock and marks
    /// the trade `COMPLETED` or `REJECTED` based on the outcome.
    ///
    /// # Errors
    ///
    /// - [`DomainError::SelfSettlement`] if payer and payee resolve to the
    ///   same account
    /// - [`DomainError::FundsInsufficient`] if the payer cannot cover the hours
    /// - [`DomainError::SettlementFailure`] on ledger storage failure
    pub async fn settle(&self, trade: &Trade, listing: &Listing) -> DomainResult<TransferReceipt> {
        let (payer, payee) = payment_flow(listing.kind(), trade.proposer(), listing.owner());

        if payer == payee {
            return Err(DomainError::SelfSettlement(payer.to_string()));
        }

        let instruction = TransferInstruction {
            trade_id: trade.id(),
            payer: payer.clone(),
            payee: payee.clone(),
            hours: trade.hours(),
            memo: format!("trade {} for '{}'", trade.id(), listing.title()),
        };

        debug!(
            trade_id = %trade.id(),
            payer = %instruction.payer,
            payee = %instruction.payee,
            hours = %instruction.hours,
            "settling trade"
        );

        self.ledger
            .transfer(instruction)
            .await
            .map_err(|err| match err {
                LedgerError::Insufficient { needed, available } => {
                    DomainError::FundsInsufficient { needed, available }
                }
                LedgerError::Storage(msg) => DomainError::SettlementFailure(msg),
                mismatch @ LedgerError::AuditMismatch { .. } => {
                    DomainError::SettlementFailure(mismatch.to_string())
                }
            })
    }
}
