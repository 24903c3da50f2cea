// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Process-wide symbol table, mapping each symbol to its storage.

use crate::stats::Statistic;
use crate::storage::StatsStorage;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, RwLock};

/// Handle to one symbol's storage, shared across request handlers.
///
/// The `RwLock` serializes concurrent ingestion and queries for the same
/// symbol; the storage itself is not internally synchronized.
pub type SharedStorage<S> = Arc<RwLock<StatsStorage<S>>>;

/// Maps symbols to their storages, creating them lazily.
///
/// Storages live for the lifetime of the process and are never evicted. All
/// of them share the same capacity and statistic type. Only map access is
/// guarded; the guard is held for a lookup and the occasional insert.
pub struct Registry<S> {
    capacity: usize,
    stores: Mutex<FxHashMap<String, SharedStorage<S>>>,
}

impl<S: Statistic> Registry<S> {
    /// Creates an empty registry whose storages retain `capacity` values.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            stores: Mutex::new(FxHashMap::default()),
        }
    }

    /// Returns the symbol's storage, creating it on first use.
    ///
    /// Creation is idempotent: concurrent callers for the same symbol all
    /// end up with the same instance.
    #[must_use]
    pub fn get_or_create(&self, symbol: &str) -> SharedStorage<S> {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let mut stores = self.stores.lock().expect("lock poisoned");

        if let Some(store) = stores.get(symbol) {
            return store.clone();
        }

        log::debug!("creating storage for symbol {symbol:?}");

        let store = Arc::new(RwLock::new(StatsStorage::new(self.capacity)));
        stores.insert(symbol.to_owned(), store.clone());
        store
    }

    /// Returns the symbol's storage if one exists.
    ///
    /// The read path uses this so queries for unknown symbols do not
    /// allocate a tree.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<SharedStorage<S>> {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let stores = self.stores.lock().expect("lock poisoned");
        stores.get(symbol).cloned()
    }

    /// Number of registered symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let stores = self.stores.lock().expect("lock poisoned");
        stores.len()
    }

    /// Returns `true` if no symbol was ever ingested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
