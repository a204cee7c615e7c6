//! Nullable infrastructure for deterministic testing.
//!
//! All external dependencies of the governance cache (clock, durable store,
//! id source, chain broadcast) sit behind traits. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically, including injected failures
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod caller;
pub mod clock;
pub mod ids;
pub mod store;

pub use caller::NullContractCaller;
pub use clock::NullClock;
pub use ids::NullIds;
pub use store::NullKvStore;
