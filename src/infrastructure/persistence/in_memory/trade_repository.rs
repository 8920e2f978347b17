//! # In-Memory Trade Repository
//!
//! In-memory implementation of [`TradeRepository`].
//!
//! This implementation uses a thread-safe `HashMap` for storage. It backs
//! the default deployment and keeps unit tests free of database
//! dependencies; a SQL adapter would implement the same port.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::use_cases::propose_trade::TradeRepository;
use crate::domain::entities::trade::Trade;
use crate::domain::value_objects::{AccountId, TradeId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`TradeRepository`].
///
/// Uses a thread-safe `HashMap` for storage. Saves detect lost updates by
/// comparing the entity version against the stored one.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTradeRepository {
    storage: Arc<RwLock<HashMap<TradeId, Trade>>>,
}

impl InMemoryTradeRepository {
    /// Creates a new empty in-memory trade repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of trades in the repository.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage
            .try_read()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    /// Returns true if the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all trades from the repository.
    pub async fn clear(&self) {
        let mut storage = self.storage.write().await;
        storage.clear();
    }
}

#[async_trait]
impl TradeRepository for InMemoryTradeRepository {
    async fn save(&self, trade: &Trade) -> ApplicationResult<()> {
        let mut storage = self.storage.write().await;

        // Check for version conflict if updating
        if let Some(existing) = storage.get(&trade.id())
            && existing.version() >= trade.version()
        {
            return Err(ApplicationError::repository(format!(
                "version conflict on trade {}: saving version {} but stored version is {}",
                trade.id(),
                trade.version(),
                existing.version()
            )));
        }

        storage.insert(trade.id(), trade.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TradeId) -> ApplicationResult<Option<Trade>> {
        let storage = self.storage.read().await;
        Ok(storage.get(&id).cloned())
    }

    async fn find_by_participant(&self, account: &AccountId) -> ApplicationResult<Vec<Trade>> {
        let storage = self.storage.read().await;
        let mut trades: Vec<Trade> = storage
            .values()
            .filter(|t| t.party_of(account).is_some())
            .cloned()
            .collect();
        trades.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(trades)
    }
}
