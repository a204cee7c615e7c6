//! Nullable contract caller — record calls without broadcasting them.

use mgrant_types::{CallError, ContractCall, ContractCaller, TxId};
use std::cell::RefCell;
use std::collections::VecDeque;

/// A test caller that records every contract call.
///
/// Calls succeed with `0x0001`, `0x0002`, ... unless a failure has been queued
/// with [`NullContractCaller::fail_next`].
pub struct NullContractCaller {
    calls: RefCell<Vec<ContractCall>>,
    failures: RefCell<VecDeque<CallError>>,
}

impl NullContractCaller {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            failures: RefCell::new(VecDeque::new()),
        }
    }

    /// Make the next call fail with `error`.
    pub fn fail_next(&self, error: CallError) {
        self.failures.borrow_mut().push_back(error);
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<ContractCall> {
        self.calls.borrow().clone()
    }
}

impl Default for NullContractCaller {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractCaller for NullContractCaller {
    fn call(&self, call: &ContractCall) -> Result<TxId, CallError> {
        self.calls.borrow_mut().push(call.clone());
        if let Some(error) = self.failures.borrow_mut().pop_front() {
            return Err(error);
        }
        Ok(TxId::new(format!("0x{:04x}", self.calls.borrow().len())))
    }
}
