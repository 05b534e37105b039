// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Interfaces to the host chain consumed by the router.
//!
//! The router decides *whether* to mint and forward; the host decides *how*.
//! Crediting balances and sending transfers are abstracted behind traits so
//! the core can run against the real bank and transfer modules or against
//! fakes that simulate failures (see [`crate::testing`]).
//!
//! # Example: Implementing a Credit Ledger
//!
//! ```rust
//! use alloy_primitives::{FixedBytes, U256};
//! use cctp_router::{CreditLedger, Result};
//! use std::collections::HashMap;
//!
//! #[derive(Default)]
//! struct Balances(HashMap<FixedBytes<32>, U256>);
//!
//! impl CreditLedger for Balances {
//!     fn credit(&mut self, recipient: &FixedBytes<32>, amount: U256) -> Result<()> {
//!         *self.0.entry(*recipient).or_default() += amount;
//!         Ok(())
//!     }
//! }
//! ```

use std::fmt;

use alloy_primitives::{FixedBytes, U256};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::router::TransferRequest;

/// Account/balance system that receives minted funds.
///
/// # Test Scenarios
///
/// Implementing this trait with fakes enables testing:
/// - Rejected credits (blocked recipient, supply cap)
/// - Rollback of the replay marker after a rejected credit
/// - Exactly-once crediting under redelivery
pub trait CreditLedger {
    /// Credits `amount` to `recipient`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::CreditFailed`](crate::RouterError::CreditFailed)
    /// if the ledger rejects the credit. The ledger must not have applied
    /// any part of a rejected credit.
    fn credit(&mut self, recipient: &FixedBytes<32>, amount: U256) -> Result<()>;
}

/// Transfer module used to forward minted funds.
///
/// Initiation is fire-and-forget from the router's point of view: the outcome
/// arrives later through
/// [`MintOrchestrator::on_forward_acknowledgement`](crate::MintOrchestrator::on_forward_acknowledgement).
pub trait ForwardTransfer {
    /// Starts a transfer and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::ForwardFailed`](crate::RouterError::ForwardFailed)
    /// if the transfer could not even be started.
    fn initiate_transfer(&mut self, request: &TransferRequest) -> Result<TransferId>;
}

/// Identifier of an initiated transfer, echoed back by its acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferId(u64);

impl TransferId {
    pub const fn new(sequence: u64) -> Self {
        Self(sequence)
    }

    pub const fn sequence(self) -> u64 {
        self.0
    }

    pub(crate) fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
