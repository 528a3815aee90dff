// 🗄️ Expense Store - append-only, in-memory record log
//
// Records are never updated or removed. Ids come from a counter owned by the
// store rather than from the sequence length, so they stay unique even if a
// removal path is ever introduced.

use crate::categories::Category;
use crate::summary::{self, Analysis, Summary, SummaryFilter};
use crate::validation::NewExpense;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

// ============================================================================
// EXPENSE RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// 1-based, assigned at insertion
    pub id: u64,
    pub category: Category,
    pub amount: f64,
    /// Date text exactly as submitted
    pub date: String,
}

// ============================================================================
// STORE
// ============================================================================

#[derive(Debug)]
pub struct ExpenseStore {
    records: Vec<Expense>,
    next_id: u64,
}

impl ExpenseStore {
    pub fn new() -> Self {
        ExpenseStore {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// Store an accepted expense and return it with its id
    pub fn append(&mut self, expense: NewExpense) -> Expense {
        let record = Expense {
            id: self.next_id,
            category: expense.category,
            amount: expense.amount,
            date: expense.date,
        };
        self.next_id += 1;
        self.records.push(record.clone());
        record
    }

    /// All records, in insertion order
    pub fn list(&self) -> &[Expense] {
        &self.records
    }

    pub fn get(&self, id: u64) -> Option<&Expense> {
        self.records.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn summarize(&self, filter: &SummaryFilter) -> Summary {
        summary::summarize(&self.records, filter)
    }

    pub fn analyze(&self) -> Analysis {
        summary::analyze(&self.records)
    }
}

impl Default for ExpenseStore {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SHARED HANDLE
// ============================================================================

/// Store handle shared by request handlers and the scheduler.
///
/// Appends take the write lock, so readers never see a half-pushed record.
/// A poisoned lock is recovered: a panicking reader cannot corrupt an
/// append-only vector.
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<RwLock<ExpenseStore>>,
}

impl SharedStore {
    pub fn new() -> Self {
        SharedStore {
            inner: Arc::new(RwLock::new(ExpenseStore::new())),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, ExpenseStore> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, ExpenseStore> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn append(&self, expense: NewExpense) -> Expense {
        self.write().append(expense)
    }
}
