//! LMDB environment setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use heed::types::Str;
use heed::{Database, Env, EnvOpenOptions};

use crate::kv::LmdbKvStore;
use crate::LmdbError;

/// Name of the single database holding every cache key.
const KV_DB: &str = "kv";

const MAX_DBS: u32 = 2;

/// Default LMDB map size: 64 MiB is far above what local governance state needs.
pub const DEFAULT_MAP_SIZE: usize = 64 * 1024 * 1024;

/// Wraps the LMDB environment and the key-value database handle.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    kv_db: Database<Str, Str>,
    path: PathBuf,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given directory.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per directory by this process
        // and never mapped twice concurrently, as heed requires.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let kv_db: Database<Str, Str> = env.create_database(&mut wtxn, Some(KV_DB))?;
        wtxn.commit()?;

        tracing::info!(path = %path.display(), map_size, "opened LMDB environment");

        Ok(Self {
            env: Arc::new(env),
            kv_db,
            path: path.to_path_buf(),
        })
    }

    /// A store handle sharing this environment.
    pub fn kv_store(&self) -> LmdbKvStore {
        LmdbKvStore::new(Arc::clone(&self.env), self.kv_db)
    }

    pub(crate) fn kv_db(&self) -> Database<Str, Str> {
        self.kv_db
    }

    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
