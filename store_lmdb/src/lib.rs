//! LMDB storage backend for the mgrant governance cache.
//!
//! Implements [`mgrant_store::KvStore`] using the `heed` LMDB bindings. All
//! keys live in a single named database of UTF-8 strings.

pub mod environment;
pub mod error;
pub mod integrity;
pub mod kv;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
pub use kv::LmdbKvStore;
