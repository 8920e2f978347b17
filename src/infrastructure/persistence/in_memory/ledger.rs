//! # In-Memory Ledger
//!
//! In-memory implementation of the [`Ledger`] port.
//!
//! All accounts and the entry log live behind one `RwLock`, so a transfer
//! is a single critical section: the funds check, both balance mutations,
//! and both ledger entries commit together or not at all. A SQL adapter
//! would instead take row locks in ascending account id order inside one
//! transaction.

use crate::application::services::settlement::{
    Ledger, LedgerError, TransferInstruction, TransferReceipt,
};
use crate::domain::entities::account::Account;
use crate::domain::entities::ledger_entry::{EntryDirection, LedgerEntry};
use crate::domain::value_objects::{AccountId, Hours};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct LedgerState {
    accounts: HashMap<AccountId, Account>,
    entries: Vec<LedgerEntry>,
}

/// In-memory implementation of the [`Ledger`] port.
///
/// Accounts are created lazily at a zero balance on first touch. Entries
/// are append-only; nothing ever mutates or removes them.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    state: Arc<RwLock<LedgerState>>,
}

impl InMemoryLedger {
    /// Creates a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an opening balance, creating the account if needed.
    ///
    /// Intended for seeding demo and test data; settlement only ever moves
    /// balances through [`Ledger::transfer`].
    pub async fn seed_balance(&self, account: AccountId, balance: Hours) {
        let mut state = self.state.write().await;
        state
            .accounts
            .insert(account.clone(), Account::with_balance(account, balance));
    }

    /// Returns the total number of ledger entries.
    pub async fn entry_count(&self) -> usize {
        self.state.read().await.entries.len()
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn balance_of(&self, account: &AccountId) -> Result<Hours, LedgerError> {
        let state = self.state.read().await;
        Ok(state
            .accounts
            .get(account)
            .map_or(Hours::ZERO, Account::balance))
    }

    async fn entries_for(&self, account: &AccountId) -> Result<Vec<LedgerEntry>, LedgerError> {
        let state = self.state.read().await;
        Ok(state
            .entries
            .iter()
            .filter(|e| e.account_id() == account)
            .cloned()
            .collect())
    }

    async fn transfer(
        &self,
        instruction: TransferInstruction,
    ) -> Result<TransferReceipt, LedgerError> {
        if instruction.payer == instruction.payee {
            return Err(LedgerError::Storage(
                "payer and payee must differ".to_string(),
            ));
        }

        let mut state = self.state.write().await;

        let payer_balance = state
            .accounts
            .get(&instruction.payer)
            .map_or(Hours::ZERO, Account::balance);
        if payer_balance < instruction.hours {
            return Err(LedgerError::Insufficient {
                needed: instruction.hours,
                available: payer_balance,
            });
        }

        // Build both entries before touching any balance, so a bad
        // instruction leaves the ledger untouched.
        let debit = LedgerEntry::new(
            instruction.payer.clone(),
            EntryDirection::Debit,
            instruction.hours,
            instruction.memo.clone(),
            instruction.trade_id,
        )
        .map_err(|err| LedgerError::Storage(err.to_string()))?;
        let credit = LedgerEntry::new(
            instruction.payee.clone(),
            EntryDirection::Credit,
            instruction.hours,
            instruction.memo.clone(),
            instruction.trade_id,
        )
        .map_err(|err| LedgerError::Storage(err.to_string()))?;

        // Stage both mutations on copies; the stored accounts change only
        // once both sides have succeeded. A failed credit must not leave
        // the payer debited with no entries written.
        let mut payer = state
            .accounts
            .get(&instruction.payer)
            .cloned()
            .unwrap_or_else(|| Account::new(instruction.payer.clone()));
        payer
            .debit(instruction.hours)
            .map_err(|err| LedgerError::Storage(err.to_string()))?;

        let mut payee = state
            .accounts
            .get(&instruction.payee)
            .cloned()
            .unwrap_or_else(|| Account::new(instruction.payee.clone()));
        payee
            .credit(instruction.hours)
            .map_err(|err| LedgerError::Storage(err.to_string()))?;

        state.accounts.insert(instruction.payer.clone(), payer);
        state.accounts.insert(instruction.payee.clone(), payee);
        state.entries.push(debit.clone());
        state.entries.push(credit.clone());

        Ok(TransferReceipt { debit, credit })
    }

    async fn audit(&self) -> Result<(), LedgerError> {
        let state = self.state.read().await;
        for (account_id, account) in &state.accounts {
            let entry_sum: Decimal = state
                .entries
                .iter()
                .filter(|e| e.account_id() == account_id)
                .map(LedgerEntry::signed_hours)
                .sum();
            // Entries record movement since the opening balance.
            let expected = account.balance().get() - account.opening_balance().get();
            if entry_sum != expected {
                return Err(LedgerError::AuditMismatch {
                    account: account_id.clone(),
                    balance: account.balance().to_string(),
                    entry_sum: entry_sum.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::TradeId;

    fn instruction(payer: &str, payee: &str, hours: f64) -> TransferInstruction {
        TransferInstruction {
            trade_id: TradeId::new_v4(),
            payer: AccountId::new(payer),
            payee: AccountId::new(payee),
            hours: Hours::new(hours).unwrap(),
            memo: "test transfer".to_string(),
        }
    }

    #[tokio::test]
    async fn untouched_account_has_zero_balance() {
        let ledger = InMemoryLedger::new();
        let balance = ledger.balance_of(&AccountId::new("alice")).await.unwrap();
        assert!(balance.is_zero());
    }

    #[tokio::test]
    async fn transfer_moves_balance_and_writes_two_entries() {
        let ledger = InMemoryLedger::new();
        ledger
            .seed_balance(AccountId::new("alice"), Hours::new(5.0).unwrap())
            .await;

        let receipt = ledger
            .transfer(instruction("alice", "bob", 2.5))
            .await
            .unwrap();

        assert_eq!(receipt.debit.direction(), EntryDirection::Debit);
        assert_eq!(receipt.credit.direction(), EntryDirection::Credit);
        assert_eq!(
            ledger.balance_of(&AccountId::new("alice")).await.unwrap(),
            Hours::new(2.5).unwrap()
        );
        assert_eq!(
            ledger.balance_of(&AccountId::new("bob")).await.unwrap(),
            Hours::new(2.5).unwrap()
        );
        assert_eq!(ledger.entry_count().await, 2);
    }

    #[tokio::test]
    async fn insufficient_funds_writes_nothing() {
        let ledger = InMemoryLedger::new();

        let result = ledger.transfer(instruction("alice", "bob", 3.0)).await;

        assert_eq!(
            result,
            Err(LedgerError::Insufficient {
                needed: Hours::new(3.0).unwrap(),
                available: Hours::ZERO,
            })
        );
        assert_eq!(ledger.entry_count().await, 0);
        assert!(ledger
            .balance_of(&AccountId::new("bob"))
            .await
            .unwrap()
            .is_zero());
    }

    #[tokio::test]
    async fn exact_balance_transfers_to_zero() {
        let ledger = InMemoryLedger::new();
        ledger
            .seed_balance(AccountId::new("alice"), Hours::new(3.0).unwrap())
            .await;

        ledger
            .transfer(instruction("alice", "bob", 3.0))
            .await
            .unwrap();

        assert!(ledger
            .balance_of(&AccountId::new("alice"))
            .await
            .unwrap()
            .is_zero());
    }

    #[tokio::test]
    async fn entries_for_filters_by_account() {
        let ledger = InMemoryLedger::new();
        ledger
            .seed_balance(AccountId::new("alice"), Hours::new(5.0).unwrap())
            .await;
        ledger
            .transfer(instruction("alice", "bob", 2.0))
            .await
            .unwrap();

        let alice_entries = ledger.entries_for(&AccountId::new("alice")).await.unwrap();
        assert_eq!(alice_entries.len(), 1);
        assert_eq!(alice_entries[0].direction(), EntryDirection::Debit);

        let bob_entries = ledger.entries_for(&AccountId::new("bob")).await.unwrap();
        assert_eq!(bob_entries.len(), 1);
        assert_eq!(bob_entries[0].direction(), EntryDirection::Credit);
    }

    #[tokio::test]
    async fn failed_credit_leaves_payer_untouched() {
        let ledger = InMemoryLedger::new();
        ledger
            .seed_balance(AccountId::new("alice"), Hours::new(5.0).unwrap())
            .await;
        // A payee already at the decimal ceiling makes the credit overflow.
        ledger
            .seed_balance(
                AccountId::new("bob"),
                Hours::from_decimal(Decimal::MAX).unwrap(),
            )
            .await;

        let result = ledger.transfer(instruction("alice", "bob", 3.0)).await;

        assert!(matches!(result, Err(LedgerError::Storage(_))));
        assert_eq!(
            ledger.balance_of(&AccountId::new("alice")).await.unwrap(),
            Hours::new(5.0).unwrap()
        );
        assert_eq!(ledger.entry_count().await, 0);
        ledger.audit().await.unwrap();
    }

    #[tokio::test]
    async fn self_transfer_is_refused() {
        let ledger = InMemoryLedger::new();
        ledger
            .seed_balance(AccountId::new("alice"), Hours::new(5.0).unwrap())
            .await;

        let result = ledger.transfer(instruction("alice", "alice", 2.0)).await;

        assert!(matches!(result, Err(LedgerError::Storage(_))));
        assert_eq!(ledger.entry_count().await, 0);
    }

    #[tokio::test]
    async fn audit_passes_after_transfers() {
        let ledger = InMemoryLedger::new();
        ledger
            .seed_balance(AccountId::new("alice"), Hours::new(5.0).unwrap())
            .await;
        ledger
            .transfer(instruction("alice", "bob", 2.0))
            .await
            .unwrap();
        ledger
            .transfer(instruction("bob", "carol", 1.5))
            .await
            .unwrap();

        ledger.audit().await.unwrap();
    }

    #[tokio::test]
    async fn audit_reports_tampered_balance() {
        let ledger = InMemoryLedger::new();
        ledger
            .seed_balance(AccountId::new("alice"), Hours::new(5.0).unwrap())
            .await;
        ledger
            .transfer(instruction("alice", "bob", 2.0))
            .await
            .unwrap();

        // Resetting the opening balance after entries exist breaks the
        // movement invariant for that account.
        ledger
            .seed_balance(AccountId::new("bob"), Hours::new(1.0).unwrap())
            .await;

        let result = ledger.audit().await;
        assert!(matches!(
            result,
            Err(LedgerError::AuditMismatch { account, .. }) if account == AccountId::new("bob")
        ));
    }
}
