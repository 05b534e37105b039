// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Replay protection for inbound messages
//!
//! Every successfully processed message leaves a permanent marker keyed by
//! its (source domain, sender, nonce) triple. The check-and-insert in
//! [`ReplayLedger::record`] is what makes redelivery of the same bytes
//! harmless.
//!
//! Burns and forward registrations live in separate namespaces. Only the
//! burn ledger carries a payload, the minted amount and recipient, so a
//! registration that arrives after its burn can still be forwarded.

use alloy_primitives::{FixedBytes, U256};
use serde::Serialize;
use tracing::debug;

use crate::error::{RouterError, Result};
use crate::protocol::DomainSender;
use crate::store::{KvStore, PrefixStore};

/// Key namespace of mint records
pub const MINT_KEY_PREFIX: &[u8] = b"mint/";
/// Key namespace of processed forward registrations
pub const REGISTRATION_KEY_PREFIX: &[u8] = b"registration/";

const MARKER: &[u8] = &[1];
const MINT_RECORD_SIZE: usize = 64;

/// A minted message, as exposed to read-only queries.
///
/// Only burns produce one. Registration messages are tracked under
/// [`REGISTRATION_KEY_PREFIX`] and never show up as mints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MintRecord {
    pub source_domain_sender: DomainSender,
    pub nonce: u64,
    pub recipient: FixedBytes<32>,
    pub amount: U256,
}

/// Append-only set of processed (domain, sender, nonce) triples.
#[derive(Debug, Clone)]
pub struct ReplayLedger<S> {
    store: PrefixStore<S>,
}

impl<S: KvStore> ReplayLedger<S> {
    /// Ledger of minted burns.
    pub fn new(store: S) -> Self {
        Self {
            store: PrefixStore::new(MINT_KEY_PREFIX, store),
        }
    }

    /// Ledger of processed registration messages.
    pub fn for_registrations(store: S) -> Self {
        Self {
            store: PrefixStore::new(REGISTRATION_KEY_PREFIX, store),
        }
    }

    /// Returns true if the triple has already been processed.
    pub fn has(&self, domain_sender: &DomainSender, nonce: u64) -> Result<bool> {
        self.store.has(&domain_sender.with_nonce(nonce))
    }

    /// Marks the triple as processed.
    ///
    /// Fails with [`RouterError::AlreadyProcessed`] without touching the store
    /// if the marker already exists.
    pub fn record(&mut self, domain_sender: &DomainSender, nonce: u64) -> Result<()> {
        self.insert(domain_sender, nonce, MARKER)
    }

    /// Marks the triple as minted and keeps what was credited.
    ///
    /// Same replay semantics as [`ReplayLedger::record`].
    pub fn record_mint(
        &mut self,
        domain_sender: &DomainSender,
        nonce: u64,
        recipient: &FixedBytes<32>,
        amount: U256,
    ) -> Result<()> {
        let mut value = [0u8; MINT_RECORD_SIZE];
        value[..32].copy_from_slice(recipient.as_slice());
        value[32..].copy_from_slice(&amount.to_be_bytes::<32>());
        self.insert(domain_sender, nonce, &value)
    }

    /// Looks up the mint record for a triple.
    pub fn mint(&self, domain_sender: &DomainSender, nonce: u64) -> Result<Option<MintRecord>> {
        let Some(value) = self.store.get(&domain_sender.with_nonce(nonce))? else {
            return Ok(None);
        };
        if value.len() != MINT_RECORD_SIZE {
            return Err(RouterError::Store(format!(
                "mint record for {domain_sender} nonce {nonce} has {} bytes",
                value.len()
            )));
        }
        Ok(Some(MintRecord {
            source_domain_sender: *domain_sender,
            nonce,
            recipient: FixedBytes::from_slice(&value[..32]),
            amount: U256::from_be_slice(&value[32..]),
        }))
    }

    /// Removes a marker written earlier in the same operation whose credit
    /// did not go through. Markers are otherwise never deleted.
    pub(crate) fn roll_back(&mut self, domain_sender: &DomainSender, nonce: u64) -> Result<()> {
        self.store.delete(&domain_sender.with_nonce(nonce))
    }

    fn insert(&mut self, domain_sender: &DomainSender, nonce: u64, value: &[u8]) -> Result<()> {
        let key = domain_sender.with_nonce(nonce);
        if self.store.has(&key)? {
            debug!(
                domain_sender = %domain_sender,
                nonce = nonce,
                event = "message_already_processed"
            );
            return Err(RouterError::AlreadyProcessed {
                domain_sender: *domain_sender,
                nonce,
            });
        }
        self.store.set(&key, value)
    }
}
