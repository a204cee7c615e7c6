//! Write-through list cache over a `KvStore`.
//!
//! Every write lands in an in-memory shadow before it is sent to the durable
//! store. When the store rejects a write (unavailable, quota exceeded) the key
//! is marked volatile: later reads of that key are served from the shadow, so
//! the session keeps working in memory. [`StateCache::flush`] pushes volatile
//! keys back to the store once it recovers.
//!
//! A key whose durable value could not be read, with nothing in the shadow to
//! stand in for it, is marked unknown. Changes to an unknown key stay in
//! memory; once the store answers again they are merged into the durable
//! list by record id instead of replacing it.
//!
//! There is no coordination between writers sharing the same durable store.
//! The last write to a key wins.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use mgrant_store::{merge_lists, KvStore, ListDocument, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::GovernanceError;

/// How a list update must reach the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Durability {
    /// Fall back to the shadow when the store rejects the write.
    BestEffort,
    /// Fail the update unless the store accepted the write.
    Required,
}

pub struct StateCache<S> {
    store: S,
    shadow: RefCell<HashMap<String, String>>,
    volatile: RefCell<BTreeSet<String>>,
    unknown: RefCell<BTreeSet<String>>,
}

impl<S: KvStore> StateCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            shadow: RefCell::new(HashMap::new()),
            volatile: RefCell::new(BTreeSet::new()),
            unknown: RefCell::new(BTreeSet::new()),
        }
    }

    /// Read and decode the list under `key`. Never fails.
    pub fn read_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.read_document::<T>(key).into_items()
    }

    /// Read the list under `key`, let `f` edit it, and write it back.
    ///
    /// Nothing is written when `f` fails or leaves the list unchanged. Entries
    /// that do not decode as `T` are written back untouched. A store failure
    /// is not an error: the value stays in memory and the key is marked
    /// volatile.
    pub fn update_list<T, R, F>(&self, key: &str, f: F) -> Result<R, GovernanceError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> Result<R, GovernanceError>,
    {
        self.apply(key, Durability::BestEffort, f)
    }

    /// Like [`StateCache::update_list`], but the change must reach the store.
    ///
    /// Fails without touching memory or the store if the durable value of
    /// `key` is unknown or the store rejects the write.
    pub fn commit_list<T, R, F>(&self, key: &str, f: F) -> Result<R, GovernanceError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> Result<R, GovernanceError>,
    {
        self.apply(key, Durability::Required, f)
    }

    /// Whether any key currently lives only in memory.
    pub fn is_degraded(&self) -> bool {
        !self.volatile.borrow().is_empty()
    }

    /// Whether the store holds the latest value of `key`.
    pub fn is_durable(&self, key: &str) -> bool {
        !self.volatile.borrow().contains(key) && !self.unknown.borrow().contains(key)
    }

    /// Keys whose latest value has not reached the durable store.
    pub fn volatile_keys(&self) -> Vec<String> {
        self.volatile.borrow().iter().cloned().collect()
    }

    /// Retry writing every volatile key. Returns how many keys were persisted.
    pub fn flush(&self) -> usize {
        let mut flushed = 0;
        for key in self.volatile_keys() {
            let unknown = self.unknown.borrow().contains(&key);
            if unknown && !self.reconcile(&key) {
                continue;
            }
            let Some(raw) = self.shadow.borrow().get(&key).cloned() else {
                continue;
            };
            match self.store.set(&key, &raw) {
                Ok(()) => {
                    self.volatile.borrow_mut().remove(&key);
                    flushed += 1;
                }
                Err(e) => {
                    tracing::debug!(key = %key, error = %e, "flush still failing");
                }
            }
        }
        if flushed > 0 {
            tracing::info!(flushed, remaining = self.volatile.borrow().len(), "flushed volatile keys");
        }
        flushed
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read_document<T: DeserializeOwned>(&self, key: &str) -> ListDocument<T> {
        match self.read_raw(key) {
            Some(raw) => ListDocument::decode(key, &raw),
            None => ListDocument::default(),
        }
    }

    fn apply<T, R, F>(&self, key: &str, durability: Durability, f: F) -> Result<R, GovernanceError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> Result<R, GovernanceError>,
    {
        let mut doc = self.read_document::<T>(key);
        if durability == Durability::Required && self.unknown.borrow().contains(key) {
            return Err(StoreError::Unavailable(format!("stored value of {key} could not be read")).into());
        }

        let before = doc.encode()?;
        let result = f(doc.items_mut())?;
        let after = doc.encode()?;
        if after == before {
            return Ok(result);
        }

        match durability {
            Durability::BestEffort => self.write_raw(key, after),
            Durability::Required => {
                self.store.set(key, &after)?;
                self.shadow.borrow_mut().insert(key.to_string(), after);
                self.volatile.borrow_mut().remove(key);
            }
        }
        Ok(result)
    }

    fn write_raw(&self, key: &str, raw: String) {
        self.shadow.borrow_mut().insert(key.to_string(), raw.clone());

        let unknown = self.unknown.borrow().contains(key);
        if unknown {
            tracing::warn!(key, "stored value unreadable, holding change in memory until it can be merged");
            self.volatile.borrow_mut().insert(key.to_string());
            return;
        }

        match self.store.set(key, &raw) {
            Ok(()) => {
                self.volatile.borrow_mut().remove(key);
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "write failed, keeping value in memory only");
                self.volatile.borrow_mut().insert(key.to_string());
            }
        }
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        let unknown = self.unknown.borrow().contains(key);
        if unknown {
            self.reconcile(key);
        }
        let volatile = self.volatile.borrow().contains(key);
        if volatile {
            return self.shadow.borrow().get(key).cloned();
        }
        match self.store.get(key) {
            Ok(value) => {
                self.unknown.borrow_mut().remove(key);
                value
            }
            Err(e) => {
                let cached = self.shadow.borrow().get(key).cloned();
                if cached.is_none() {
                    tracing::warn!(key, error = %e, "read failed with nothing cached, holding writes in memory");
                    self.unknown.borrow_mut().insert(key.to_string());
                } else {
                    tracing::warn!(key, error = %e, "read failed, falling back to memory");
                }
                cached
            }
        }
    }

    /// Fold in-memory changes to an unknown key into its durable value.
    ///
    /// Returns `false` while the store still cannot be read. On success the
    /// merged list replaces the shadow and stays volatile until written.
    fn reconcile(&self, key: &str) -> bool {
        let durable = match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(key, error = %e, "stored value still unreadable");
                return false;
            }
        };
        let local = self.shadow.borrow().get(key).cloned();

        let merged = match (durable, local) {
            (Some(durable), Some(local)) => match merge_lists(key, &durable, &local) {
                Ok(merged) => merged,
                Err(e) => {
                    tracing::warn!(key, error = %e, "could not merge in-memory changes");
                    return false;
                }
            },
            (None, Some(local)) => local,
            (_, None) => {
                self.unknown.borrow_mut().remove(key);
                return true;
            }
        };

        tracing::info!(key, "merged in-memory changes into stored list");
        self.shadow.borrow_mut().insert(key.to_string(), merged);
        self.volatile.borrow_mut().insert(key.to_string());
        self.unknown.borrow_mut().remove(key);
        true
    }
}
