//! Key-value persistence adapter for the mgrant governance cache.
//!
//! Every durable backend (LMDB, in-memory for testing) implements [`KvStore`].
//! The governance stores depend only on the trait and keep each of their lists
//! as a single JSON array under one string key.

pub mod error;
pub mod keys;
pub mod kv;
pub mod list;

pub use error::StoreError;
pub use kv::KvStore;
pub use list::{decode_list, encode_list, merge_lists, ListDocument};
