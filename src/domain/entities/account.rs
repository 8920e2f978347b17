//! # Account Entity
//!
//! A wallet holding a balance of hours.
//!
//! Accounts are created lazily at a zero balance the first time settlement
//! touches them. Identity management lives outside this crate; the account
//! here is only the wallet side of a user.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{AccountId, Hours};
use serde::{Deserialize, Serialize};

/// A wallet account.
///
/// # Invariants
///
/// - Balance is never negative: a debit larger than the balance fails and
///   leaves the account untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// The wallet owner.
    id: AccountId,
    /// Current balance in hours.
    balance: Hours,
    /// Balance the account opened with; ledger entries only record
    /// movements after this point.
    opening_balance: Hours,
    /// When this account was created.
    created_at: Timestamp,
    /// When the balance last changed.
    updated_at: Timestamp,
}

impl Account {
    /// Creates a new account with a zero balance.
    #[must_use]
    pub fn new(id: AccountId) -> Self {
        Self::with_balance(id, Hours::ZERO)
    }

    /// Creates an account with an opening balance.
    #[must_use]
    pub fn with_balance(id: AccountId, balance: Hours) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            balance,
            opening_balance: balance,
            created_at: now,
            updated_at: now,
        }
    }

    /// Adds hours to the balance.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Overflow`] if the balance would overflow.
    pub fn credit(&mut self, hours: Hours) -> DomainResult<()> {
        self.balance = self.balance.safe_add(hours)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Removes hours from the balance.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::FundsInsufficient`] if the balance does not
    /// cover the debit. The balance is unchanged on error.
    pub fn debit(&mut self, hours: Hours) -> DomainResult<()> {
        if self.balance < hours {
            return Err(DomainError::FundsInsufficient {
                needed: hours,
                available: self.balance,
            });
        }
        self.balance = self.balance.safe_sub(hours)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Returns true if the balance covers `hours`.
    #[inline]
    #[must_use]
    pub fn can_cover(&self, hours: Hours) -> bool {
        self.balance >= hours
    }

    /// Returns the account ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &AccountId {
        &self.id
    }

    /// Returns the current balance.
    #[inline]
    #[must_use]
    pub fn balance(&self) -> Hours {
        self.balance
    }

    /// Returns the balance the account opened with.
    #[inline]
    #[must_use]
    pub fn opening_balance(&self) -> Hours {
        self.opening_balance
    }

    /// Returns when this account was created.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when the balance last changed.
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

    #[test]
    fn new_account_has_zero_balance() {
        let account = Account::new(AccountId::new("alice"));
        assert!(account.balance().is_zero());
    }

    #[test]
    fn credit_increases_balance() {
        let mut account = Account::new(AccountId::new("alice"));
        account.credit(Hours::new(2.5).unwrap()).unwrap();
        assert_eq!(account.balance(), Hours::new(2.5).unwrap());
    }

    #[test]
    fn debit_decreases_balance() {
        let mut account = Account::with_balance(AccountId::new("alice"), Hours::new(5.0).unwrap());
        account.debit(Hours::new(2.5).unwrap()).unwrap();
        assert_eq!(account.balance(), Hours::new(2.5).unwrap());
    }

    #[test]
    fn debit_beyond_balance_fails_and_preserves_balance() {
        let mut account = Account::new(AccountId::new("alice"));
        let result = account.debit(Hours::new(3.0).unwrap());
        assert_eq!(
            result,
            Err(DomainError::FundsInsufficient {
                needed: Hours::new(3.0).unwrap(),
                available: Hours::ZERO,
            })
        );
        assert!(account.balance().is_zero());
    }

    #[test]
    fn debit_entire_balance_succeeds() {
        let mut account = Account::with_balance(AccountId::new("alice"), Hours::new(3.0).unwrap());
        account.debit(Hours::new(3.0).unwrap()).unwrap();
        assert!(account.balance().is_zero());
    }

    #[test]
    fn can_cover_checks_balance() {
        let account = Account::with_balance(AccountId::new("alice"), Hours::new(5.0).unwrap());
        assert!(account.can_cover(Hours::new(5.0).unwrap()));
        assert!(!account.can_cover(Hours::new(5.01).unwrap()));
    }
}
