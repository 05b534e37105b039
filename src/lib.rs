// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! # cctp-router
//!
//! Destination-side core of Circle's Cross-Chain Transfer Protocol (CCTP) for
//! a chain that receives burn-and-mint transfers and can forward the minted
//! USDC onward.
//!
//! The host chain hands every relayed message to a [`MintOrchestrator`]. The
//! orchestrator decodes it, guarantees each (source domain, sender, nonce)
//! mints exactly once, credits the recipient through the host's
//! [`CreditLedger`], and starts any forward the depositor registered through
//! the host's [`ForwardTransfer`].
//!
//! ## Quick Start
//!
//! ```rust
//! use alloy_primitives::{Bytes, FixedBytes, U256};
//! use cctp_router::testing::{FakeCreditLedger, FakeForwardTransfer};
//! use cctp_router::{
//!     BurnMessage, DomainId, MemoryStore, Message, MintOrchestrator, RouterConfig,
//! };
//!
//! let ledger = FakeCreditLedger::new();
//! let mut router = MintOrchestrator::with_store(
//!     RouterConfig::default(),
//!     MemoryStore::new(),
//!     ledger.clone(),
//!     FakeForwardTransfer::new(),
//! );
//!
//! let recipient = FixedBytes::from([0x22u8; 32]);
//! let burn = BurnMessage::new(
//!     FixedBytes::from([0x01u8; 32]),
//!     recipient,
//!     U256::from(1_000_000u64),
//!     FixedBytes::from([0x33u8; 32]),
//! );
//! let message = Message {
//!     version: 0,
//!     source_domain: DomainId::ETHEREUM,
//!     destination_domain: DomainId::NOBLE,
//!     nonce: 42,
//!     sender: FixedBytes::from([0x44u8; 32]),
//!     recipient: FixedBytes::ZERO,
//!     destination_caller: FixedBytes::ZERO,
//!     message_body: burn.encode(),
//! };
//!
//! let minted = router.process_inbound_message(&message.encode()).unwrap();
//! assert_eq!(minted.amount, U256::from(1_000_000u64));
//! assert_eq!(ledger.balance_of(&recipient), U256::from(1_000_000u64));
//!
//! // Redelivery is rejected without a second credit
//! let replay = router.process_inbound_message(&message.encode()).unwrap_err();
//! assert!(replay.is_already_processed());
//! ```
//!
//! ## Public API
//!
//! - [`Message`], [`BurnMessage`] - fixed-layout CCTP wire messages
//! - [`ForwardMetadata`], [`ForwardIntent`] - protobuf forwarding records
//! - [`ReplayLedger`], [`ForwardIntentStore`] - persistent router state
//! - [`MintOrchestrator`] - message processing and acknowledgment handling
//! - [`CreditLedger`], [`ForwardTransfer`], [`KvStore`] - host interfaces
//! - [`MintQuery`] - read-only lookups
//! - [`RouterError`] and [`Result`] - error types

mod error;
mod forward;
mod protocol;
mod replay;
mod router;
mod store;
mod traits;

pub mod query;

pub use error::{DecodingError, Result, RouterError};
pub use forward::{
    ForwardIntentStore, InFlightTransfer, FORWARDED_KEY_PREFIX, FORWARD_KEY_PREFIX,
    IN_FLIGHT_KEY_PREFIX,
};
pub use protocol::{BurnMessage, DomainId, DomainSender, ForwardIntent, ForwardMetadata, Message};
pub use query::MintQuery;
pub use replay::{MintRecord, ReplayLedger, MINT_KEY_PREFIX, REGISTRATION_KEY_PREFIX};
pub use router::{
    ForwardAck, MintOrchestrator, MintResult, Registration, Routed, RouterConfig,
    TransferRequest, ENV_ENFORCE_DESTINATION_DOMAIN, ENV_LOCAL_DOMAIN, ENV_MESSAGE_BODY_VERSION,
    ENV_MESSAGE_VERSION,
};
pub use store::{KvStore, MemoryStore, PrefixStore};
pub use traits::{CreditLedger, ForwardTransfer, TransferId};

// Public module for advanced users who need custom instrumentation
pub mod spans;

// Fakes of the host interfaces for integration tests
pub mod testing;
