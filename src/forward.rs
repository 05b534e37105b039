// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Pending forwarding instructions and their acknowledgment outcome
//!
//! Intents are keyed by the (domain, sender) pair that will later send the
//! burn. They stay in the store after the forward is initiated so that the
//! asynchronous acknowledgment can still be recorded against them.

use tracing::{debug, info, warn};

use crate::error::{RouterError, Result};
use crate::protocol::{DomainSender, ForwardIntent};
use crate::store::{KvStore, PrefixStore};
use crate::traits::TransferId;

/// Key namespace of forward intents
pub const FORWARD_KEY_PREFIX: &[u8] = b"forward/";
/// Key namespace mapping initiated transfers back to their intent
pub const IN_FLIGHT_KEY_PREFIX: &[u8] = b"inflight/";
/// Key namespace of (domain, sender, nonce) mints that already started a forward
pub const FORWARDED_KEY_PREFIX: &[u8] = b"forwarded/";

const MARKER: &[u8] = &[1];

/// The intent an initiated transfer was started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InFlightTransfer {
    pub domain_sender: DomainSender,
    /// Nonce of the mint that started the transfer
    pub nonce: u64,
}

#[derive(Debug, Clone)]
pub struct ForwardIntentStore<S> {
    intents: PrefixStore<S>,
    in_flight: PrefixStore<S>,
    forwarded: PrefixStore<S>,
}

impl<S: KvStore + Clone> ForwardIntentStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            intents: PrefixStore::new(FORWARD_KEY_PREFIX, store.clone()),
            in_flight: PrefixStore::new(IN_FLIGHT_KEY_PREFIX, store.clone()),
            forwarded: PrefixStore::new(FORWARDED_KEY_PREFIX, store),
        }
    }
}

impl<S: KvStore> ForwardIntentStore<S> {
    /// Stores an intent, replacing any previous one for the same pair.
    pub fn put(&mut self, domain_sender: &DomainSender, intent: &ForwardIntent) -> Result<()> {
        self.intents
            .set(&domain_sender.to_bytes(), &intent.encode())
    }

    /// Reads the intent for a pair without any correlation check.
    pub fn get(&self, domain_sender: &DomainSender) -> Result<Option<ForwardIntent>> {
        self.intents
            .get(&domain_sender.to_bytes())?
            .map(|bytes| ForwardIntent::decode(&bytes).map_err(RouterError::from))
            .transpose()
    }

    /// Returns the intent that belongs to the mint of `nonce` from
    /// `domain_sender`, if one was registered and that mint has not started a
    /// forward yet.
    ///
    /// Instructions carry the nonce of the burn they were attached to, so an
    /// intent left over from an earlier burn of the same sender does not
    /// match. Once [`ForwardIntentStore::mark_forwarded`] ran for the pair and
    /// nonce, nothing is returned, so each mint forwards at most once whether
    /// the registration arrived before or after the burn.
    pub fn take_for_mint(
        &self,
        domain_sender: &DomainSender,
        nonce: u64,
    ) -> Result<Option<ForwardIntent>> {
        let Some(intent) = self.get(domain_sender)? else {
            return Ok(None);
        };
        if intent.metadata.nonce != nonce {
            debug!(
                domain_sender = %domain_sender,
                intent_nonce = intent.metadata.nonce,
                mint_nonce = nonce,
                event = "forward_intent_nonce_mismatch"
            );
            return Ok(None);
        }
        if self.forwarded.has(&domain_sender.with_nonce(nonce))? {
            debug!(
                domain_sender = %domain_sender,
                nonce = nonce,
                event = "mint_already_forwarded"
            );
            return Ok(None);
        }
        Ok(Some(intent))
    }

    /// Records that the mint of `nonce` has started its forward.
    pub fn mark_forwarded(&mut self, domain_sender: &DomainSender, nonce: u64) -> Result<()> {
        self.forwarded.set(&domain_sender.with_nonce(nonce), MARKER)
    }

    /// Records that the forward triggered by this intent failed.
    ///
    /// Idempotent, and a no-op when no intent exists.
    pub fn mark_ack_error(&mut self, domain_sender: &DomainSender) -> Result<()> {
        let Some(intent) = self.get(domain_sender)? else {
            debug!(
                domain_sender = %domain_sender,
                event = "ack_error_without_intent"
            );
            return Ok(());
        };
        self.set_ack_error(domain_sender, intent)
    }

    /// Like [`ForwardIntentStore::mark_ack_error`], but only if the stored
    /// intent is still the one registered for the mint of `nonce`.
    ///
    /// Returns false and leaves the store untouched when the intent is gone
    /// or has been replaced by a registration for another burn.
    pub fn mark_ack_error_for(
        &mut self,
        domain_sender: &DomainSender,
        nonce: u64,
    ) -> Result<bool> {
        match self.get(domain_sender)? {
            Some(intent) if intent.metadata.nonce == nonce => {
                self.set_ack_error(domain_sender, intent)?;
                Ok(true)
            }
            Some(intent) => {
                warn!(
                    domain_sender = %domain_sender,
                    intent_nonce = intent.metadata.nonce,
                    transfer_nonce = nonce,
                    event = "stale_forward_acknowledgement"
                );
                Ok(false)
            }
            None => {
                warn!(
                    domain_sender = %domain_sender,
                    transfer_nonce = nonce,
                    event = "stale_forward_acknowledgement"
                );
                Ok(false)
            }
        }
    }

    /// Remembers which intent, and which mint of it, an initiated transfer
    /// belongs to.
    pub fn track_transfer(
        &mut self,
        transfer_id: TransferId,
        domain_sender: &DomainSender,
        nonce: u64,
    ) -> Result<()> {
        self.in_flight
            .set(&transfer_id.to_be_bytes(), &domain_sender.with_nonce(nonce))
    }

    /// Removes and returns the origin of an acknowledged transfer.
    pub fn resolve_transfer(
        &mut self,
        transfer_id: TransferId,
    ) -> Result<Option<InFlightTransfer>> {
        let key = transfer_id.to_be_bytes();
        let Some(raw) = self.in_flight.get(&key)? else {
            return Ok(None);
        };
        let (domain_sender, nonce) = DomainSender::split_nonce(&raw)?;
        self.in_flight.delete(&key)?;
        Ok(Some(InFlightTransfer {
            domain_sender,
            nonce,
        }))
    }

    fn set_ack_error(
        &mut self,
        domain_sender: &DomainSender,
        mut intent: ForwardIntent,
    ) -> Result<()> {
        if intent.ack_error {
            return Ok(());
        }
        intent.ack_error = true;
        self.put(domain_sender, &intent)?;
        info!(
            domain_sender = %domain_sender,
            nonce = intent.metadata.nonce,
            event = "forward_ack_error_recorded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{DomainId, ForwardMetadata};
    use crate::store::MemoryStore;
    use alloy_primitives::FixedBytes;

    fn sender() -> DomainSender {
        DomainSender::new(DomainId::NOBLE, FixedBytes::from([7u8; 32]))
    }

    fn intent(nonce: u64, channel: &str) -> ForwardIntent {
        ForwardIntent::new(
            sender(),
            ForwardMetadata {
                nonce,
                port: "transfer".to_string(),
                channel: channel.to_string(),
                destination_receiver: "osmo1receiver".to_string(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_put_is_last_write_wins() {
        let mut store = ForwardIntentStore::new(MemoryStore::new());
        store.put(&sender(), &intent(1, "channel-0")).unwrap();
        store.put(&sender(), &intent(1, "channel-9")).unwrap();

        assert_eq!(store.get(&sender()).unwrap(), Some(intent(1, "channel-9")));
    }

    #[test]
    fn test_take_for_mint_absent_is_none() {
        let store = ForwardIntentStore::new(MemoryStore::new());
        assert_eq!(store.take_for_mint(&sender(), 1).unwrap(), None);
    }

    #[test]
    fn test_take_for_mint_matches_nonce() {
        let mut store = ForwardIntentStore::new(MemoryStore::new());
        store.put(&sender(), &intent(3, "channel-0")).unwrap();

        assert_eq!(store.take_for_mint(&sender(), 2).unwrap(), None);
        assert_eq!(
            store.take_for_mint(&sender(), 3).unwrap(),
            Some(intent(3, "channel-0"))
        );
        // the intent stays available for the acknowledgment
        assert!(store.get(&sender()).unwrap().is_some());
    }

    #[test]
    fn test_take_for_mint_once_forwarded_is_none() {
        let mut store = ForwardIntentStore::new(MemoryStore::new());
        store.put(&sender(), &intent(3, "channel-0")).unwrap();
        store.mark_forwarded(&sender(), 3).unwrap();

        assert_eq!(store.take_for_mint(&sender(), 3).unwrap(), None);

        // a fresh intent for the next burn is unaffected
        store.put(&sender(), &intent(4, "channel-0")).unwrap();
        assert!(store.take_for_mint(&sender(), 4).unwrap().is_some());
    }

    #[test]
    fn test_mark_ack_error_is_idempotent() {
        let mut store = ForwardIntentStore::new(MemoryStore::new());
        store.put(&sender(), &intent(1, "channel-0")).unwrap();

        store.mark_ack_error(&sender()).unwrap();
        store.mark_ack_error(&sender()).unwrap();

        let stored = store.get(&sender()).unwrap().unwrap();
        assert!(stored.ack_error);
        assert_eq!(stored.metadata, intent(1, "channel-0").metadata);
    }

    #[test]
    fn test_mark_ack_error_without_intent_is_noop() {
        let backing = MemoryStore::new();
        let mut store = ForwardIntentStore::new(backing.clone());

        store.mark_ack_error(&sender()).unwrap();
        assert!(backing.is_empty());
    }

    #[test]
    fn test_mark_ack_error_for_checks_nonce() {
        let mut store = ForwardIntentStore::new(MemoryStore::new());
        store.put(&sender(), &intent(2, "channel-0")).unwrap();

        assert!(!store.mark_ack_error_for(&sender(), 1).unwrap());
        assert!(!store.get(&sender()).unwrap().unwrap().ack_error);

        assert!(store.mark_ack_error_for(&sender(), 2).unwrap());
        assert!(store.get(&sender()).unwrap().unwrap().ack_error);
    }

    #[test]
    fn test_mark_ack_error_for_without_intent() {
        let backing = MemoryStore::new();
        let mut store = ForwardIntentStore::new(backing.clone());

        assert!(!store.mark_ack_error_for(&sender(), 1).unwrap());
        assert!(backing.is_empty());
    }

    #[test]
    fn test_corrupt_intent_surfaces_decoding_error() {
        let mut backing = MemoryStore::new();
        let mut key = FORWARD_KEY_PREFIX.to_vec();
        key.extend_from_slice(&sender().to_bytes());
        backing.set(&key, &[0x0b]).unwrap();

        let store = ForwardIntentStore::new(backing);
        assert!(matches!(
            store.get(&sender()).unwrap_err(),
            RouterError::Decoding(_)
        ));
    }

    #[test]
    fn test_transfer_tracking() {
        let mut store = ForwardIntentStore::new(MemoryStore::new());
        store
            .track_transfer(TransferId::new(42), &sender(), 11)
            .unwrap();

        assert_eq!(
            store.resolve_transfer(TransferId::new(42)).unwrap(),
            Some(InFlightTransfer {
                domain_sender: sender(),
                nonce: 11,
            })
        );
        assert_eq!(store.resolve_transfer(TransferId::new(42)).unwrap(), None);
        assert_eq!(store.resolve_transfer(TransferId::new(7)).unwrap(), None);
    }
}
