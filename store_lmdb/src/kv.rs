//! LMDB implementation of KvStore.

use std::sync::Arc;

use heed::types::Str;
use heed::{Database, Env};

use mgrant_store::{KvStore, StoreError};

use crate::LmdbError;

/// String-keyed store backed by one LMDB database.
///
/// Every `set` and `remove` commits its own write transaction, so each call is
/// durable on return.
#[derive(Clone)]
pub struct LmdbKvStore {
    env: Arc<Env>,
    db: Database<Str, Str>,
}

impl LmdbKvStore {
    pub(crate) fn new(env: Arc<Env>, db: Database<Str, Str>) -> Self {
        Self { env, db }
    }

    /// Number of keys stored.
    pub fn len(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.db.len(&rtxn).map_err(LmdbError::from)?)
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

fn write_error(key: &str, e: heed::Error) -> StoreError {
    match LmdbError::from(e) {
        LmdbError::MapFull => StoreError::QuotaExceeded {
            key: key.to_string(),
        },
        other => other.into(),
    }
}

impl KvStore for LmdbKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let value = self.db.get(&rtxn, key).map_err(LmdbError::from)?;
        Ok(value.map(str::to_owned))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(|e| write_error(key, e))?;
        self.db
            .put(&mut wtxn, key, value)
            .map_err(|e| write_error(key, e))?;
        wtxn.commit().map_err(|e| write_error(key, e))?;
        tracing::trace!(key, bytes = value.len(), "kv set");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.db.delete(&mut wtxn, key).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
