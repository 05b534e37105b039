// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Test utilities and fake implementations of the host interfaces
//!
//! These fakes stand in for the host's bank, transfer module, and state store
//! so the router can be exercised end to end, including the failure paths:
//! rejected credits, transfers that cannot be started, and stores that fail
//! mid-operation.
//!
//! All fakes are cheap to clone and clones share state, so a test can hand
//! one handle to the orchestrator and keep another for assertions.

use alloy_primitives::{FixedBytes, U256};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::router::TransferRequest;
use crate::store::{KvStore, MemoryStore};
use crate::traits::{CreditLedger, ForwardTransfer, TransferId};
use crate::{Result, RouterError};

// ============================================================================
// Fake Credit Ledger
// ============================================================================

/// A fake bank that keeps balances in memory.
///
/// This allows testing scenarios like:
/// - Exactly-once crediting under redelivery
/// - Credits rejected for a blocked recipient
/// - Credits rejected across the board
#[derive(Clone, Debug, Default)]
pub struct FakeCreditLedger {
    balances: Arc<Mutex<HashMap<FixedBytes<32>, U256>>>,
    credits: Arc<Mutex<Vec<(FixedBytes<32>, U256)>>>,
    blocked: Arc<Mutex<HashSet<FixedBytes<32>>>>,
    fail_all: Arc<Mutex<bool>>,
}

impl FakeCreditLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every credit to `recipient`
    pub fn block_recipient(&self, recipient: FixedBytes<32>) {
        self.blocked.lock().unwrap().insert(recipient);
    }

    /// Reject all credits until cleared
    pub fn set_failing(&self, failing: bool) {
        *self.fail_all.lock().unwrap() = failing;
    }

    pub fn balance_of(&self, recipient: &FixedBytes<32>) -> U256 {
        self.balances
            .lock()
            .unwrap()
            .get(recipient)
            .copied()
            .unwrap_or_default()
    }

    /// Successful credits, in order
    pub fn credits(&self) -> Vec<(FixedBytes<32>, U256)> {
        self.credits.lock().unwrap().clone()
    }

    pub fn credit_count(&self) -> usize {
        self.credits.lock().unwrap().len()
    }
}

impl CreditLedger for FakeCreditLedger {
    fn credit(&mut self, recipient: &FixedBytes<32>, amount: U256) -> Result<()> {
        if *self.fail_all.lock().unwrap() {
            return Err(RouterError::CreditFailed {
                reason: "Simulated ledger outage".to_string(),
            });
        }
        if self.blocked.lock().unwrap().contains(recipient) {
            return Err(RouterError::CreditFailed {
                reason: format!("recipient {recipient} is blocked"),
            });
        }

        *self
            .balances
            .lock()
            .unwrap()
            .entry(*recipient)
            .or_default() += amount;
        self.credits.lock().unwrap().push((*recipient, amount));
        Ok(())
    }
}

// ============================================================================
// Fake Forward Transfer
// ============================================================================

/// A fake transfer module that records every initiated transfer.
///
/// Transfer ids are handed out sequentially starting at 1. Initiation can be
/// made to fail to exercise the synchronous failure path.
#[derive(Clone, Debug, Default)]
pub struct FakeForwardTransfer {
    requests: Arc<Mutex<Vec<TransferRequest>>>,
    next_sequence: Arc<Mutex<u64>>,
    failing: Arc<Mutex<bool>>,
}

impl FakeForwardTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every initiation fail until cleared
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    /// Successfully initiated transfers, in order
    pub fn requests(&self) -> Vec<TransferRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl ForwardTransfer for FakeForwardTransfer {
    fn initiate_transfer(&mut self, request: &TransferRequest) -> Result<TransferId> {
        if *self.failing.lock().unwrap() {
            return Err(RouterError::ForwardFailed {
                reason: format!("channel {} is closed", request.channel()),
            });
        }

        let mut sequence = self.next_sequence.lock().unwrap();
        *sequence += 1;
        self.requests.lock().unwrap().push(request.clone());
        Ok(TransferId::new(*sequence))
    }
}

// ============================================================================
// Failing Store
// ============================================================================

/// A [`MemoryStore`] wrapper whose writes can be made to fail by key prefix.
///
/// This allows testing that failed operations leave no partial state, and
/// how a failed rollback is reported.
#[derive(Clone, Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    failing_sets: Arc<Mutex<Vec<Vec<u8>>>>,
    failing_deletes: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl FailingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    /// Fail every `set` whose key starts with `prefix`
    pub fn fail_sets_with_prefix(&self, prefix: &[u8]) {
        self.failing_sets.lock().unwrap().push(prefix.to_vec());
    }

    /// Fail every `delete` whose key starts with `prefix`
    pub fn fail_deletes_with_prefix(&self, prefix: &[u8]) {
        self.failing_deletes.lock().unwrap().push(prefix.to_vec());
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn matches(prefixes: &Mutex<Vec<Vec<u8>>>, key: &[u8]) -> bool {
        prefixes
            .lock()
            .unwrap()
            .iter()
            .any(|prefix| key.starts_with(prefix))
    }
}

impl KvStore for FailingStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        if Self::matches(&self.failing_sets, key) {
            return Err(RouterError::Store("Simulated write failure".to_string()));
        }
        self.inner.set(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        if Self::matches(&self.failing_deletes, key) {
            return Err(RouterError::Store("Simulated delete failure".to_string()));
        }
        self.inner.delete(key)
    }
}
