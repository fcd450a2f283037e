// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The transaction log and its persistence seam.

use crate::error::{TrackerError, TrackerResult};
use crate::models::{NewTransaction, Transaction, TransactionId};

/// Loads and saves the whole transaction log, oldest first.
pub trait TransactionPersistence {
    fn load(&self) -> TrackerResult<Vec<Transaction>>;
    fn save(&mut self, transactions: &[Transaction]) -> TrackerResult<()>;
}

/// Keeps the log in memory. Useful for embedding and for tests that need a
/// collaborator which can be made to fail.
#[derive(Debug, Default, Clone)]
pub struct MemoryPersistence {
    saved: Vec<Transaction>,
    fail_load: bool,
    fail_save: bool,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transactions(saved: Vec<Transaction>) -> Self {
        Self {
            saved,
            ..Self::default()
        }
    }

    pub fn failing_load(mut self) -> Self {
        self.fail_load = true;
        self
    }

    pub fn set_fail_save(&mut self, fail: bool) {
        self.fail_save = fail;
    }

    pub fn saved(&self) -> &[Transaction] {
        &self.saved
    }
}

impl TransactionPersistence for MemoryPersistence {
    fn load(&self) -> TrackerResult<Vec<Transaction>> {
        if self.fail_load {
            return Err(TrackerError::persistence("memory load disabled"));
        }
        Ok(self.saved.clone())
    }

    fn save(&mut self, transactions: &[Transaction]) -> TrackerResult<()> {
        if self.fail_save {
            return Err(TrackerError::persistence("memory save disabled"));
        }
        self.saved = transactions.to_vec();
        Ok(())
    }
}

/// Ordered transaction log, the single source of truth for reports.
///
/// Every mutation is saved immediately. A failed save rolls the mutation
/// back, so the in-memory log always equals the last successful save.
pub struct TransactionStore<P: TransactionPersistence> {
    persistence: P,
    transactions: Vec<Transaction>,
    next_id: TransactionId,
    load_failed: bool,
}

impl<P: TransactionPersistence> TransactionStore<P> {
    /// Loads the log from `persistence`. A load failure is logged and the
    /// store starts empty.
    pub fn init(persistence: P) -> Self {
        let mut store = Self {
            persistence,
            transactions: Vec::new(),
            next_id: 1,
            load_failed: false,
        };
        store.load();
        store
    }

    /// Replaces the in-memory log with what persistence holds now.
    pub fn load(&mut self) {
        let loaded = self.persistence.load();
        self.load_failed = loaded.is_err();
        self.transactions = loaded.unwrap_or_else(|err| {
            log::warn!("could not load transactions, starting empty: {}", err);
            Vec::new()
        });
        self.next_id = self.transactions.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        log::debug!("store loaded {} transactions", self.transactions.len());
    }

    pub fn add(&mut self, new: NewTransaction) -> TrackerResult<TransactionId> {
        let id = self.next_id;
        self.transactions.push(new.into_transaction(id));
        if let Err(err) = self.persist() {
            self.transactions.pop();
            return Err(err);
        }
        self.next_id += 1;
        log::debug!("added transaction {}", id);
        Ok(id)
    }

    /// Returns `Ok(false)` when no transaction has `id`.
    pub fn remove(&mut self, id: TransactionId) -> TrackerResult<bool> {
        let Some(pos) = self.transactions.iter().position(|t| t.id == id) else {
            log::debug!("{}", TrackerError::NotFound(id));
            return Ok(false);
        };
        let removed = self.transactions.remove(pos);
        if let Err(err) = self.persist() {
            self.transactions.insert(pos, removed);
            return Err(err);
        }
        log::debug!("removed transaction {}", id);
        Ok(true)
    }

    pub fn clear(&mut self) -> TrackerResult<()> {
        let previous = std::mem::take(&mut self.transactions);
        if let Err(err) = self.persist() {
            self.transactions = previous;
            return Err(err);
        }
        log::debug!("cleared {} transactions", previous.len());
        Ok(())
    }

    /// Snapshot of the log in insertion order, oldest first.
    pub fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// The `limit` most recently added transactions, newest first.
    pub fn recent(&self, limit: usize) -> Vec<&Transaction> {
        self.transactions.iter().rev().take(limit).collect()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// True when the last load failed and the store started empty. Saving
    /// in that state replaces whatever persistence still holds.
    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    /// Releases the store and hands back its persistence collaborator.
    pub fn teardown(self) -> P {
        self.persistence
    }

    fn persist(&mut self) -> TrackerResult<()> {
        self.persistence.save(&self.transactions).inspect_err(|err| {
            log::error!("saving transactions failed: {}", err);
        })
    }
}
