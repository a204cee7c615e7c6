//! Nullable id source — sequential, predictable ids.

use mgrant_types::{IdGenerator, TypesError};
use std::cell::Cell;

/// Hands out `{prefix}_1`, `{prefix}_2`, ... in call order.
pub struct NullIds {
    next: Cell<u64>,
}

impl NullIds {
    pub fn new() -> Self {
        Self { next: Cell::new(1) }
    }
}

impl Default for NullIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for NullIds {
    fn next_id(&self, prefix: &str) -> Result<String, TypesError> {
        let n = self.next.get();
        self.next.set(n + 1);
        Ok(format!("{prefix}_{n}"))
    }
}
