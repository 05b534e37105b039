// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use alloy_primitives::U256;
use bon::Builder;
use tracing::{debug, error, info, warn};

use super::config::RouterConfig;
use super::params::{ForwardAck, MintResult, Registration, Routed, TransferRequest};
use crate::error::{DecodingError, Result, RouterError};
use crate::forward::{ForwardIntentStore, InFlightTransfer};
use crate::protocol::{BurnMessage, DomainSender, ForwardIntent, ForwardMetadata, Message};
use crate::query::MintQuery;
use crate::replay::ReplayLedger;
use crate::spans;
use crate::store::KvStore;
use crate::traits::{CreditLedger, ForwardTransfer, TransferId};

/// Applies relayed burn messages: decode, replay check, credit, forward.
///
/// The orchestrator is driven by the host's sequential executor, one message
/// at a time. It owns explicit handles to its stores and to the host's
/// credit and transfer interfaces; nothing is global.
///
/// # Example
///
/// ```rust
/// use cctp_router::testing::{FakeCreditLedger, FakeForwardTransfer};
/// use cctp_router::{MemoryStore, MintOrchestrator, RouterConfig};
///
/// let router = MintOrchestrator::with_store(
///     RouterConfig::default(),
///     MemoryStore::new(),
///     FakeCreditLedger::new(),
///     FakeForwardTransfer::new(),
/// );
/// assert_eq!(router.config().local_domain.as_u32(), 4);
/// ```
#[derive(Builder)]
pub struct MintOrchestrator<S, L, F>
where
    S: KvStore,
    L: CreditLedger,
    F: ForwardTransfer,
{
    #[builder(default)]
    config: RouterConfig,
    replay: ReplayLedger<S>,
    registrations: ReplayLedger<S>,
    intents: ForwardIntentStore<S>,
    ledger: L,
    forwarder: F,
}

impl<S, L, F> MintOrchestrator<S, L, F>
where
    S: KvStore + Clone,
    L: CreditLedger,
    F: ForwardTransfer,
{
    /// Builds every store as a namespace of one backing store.
    pub fn with_store(config: RouterConfig, store: S, ledger: L, forwarder: F) -> Self {
        Self {
            config,
            replay: ReplayLedger::new(store.clone()),
            registrations: ReplayLedger::for_registrations(store.clone()),
            intents: ForwardIntentStore::new(store),
            ledger,
            forwarder,
        }
    }
}

impl<S, L, F> MintOrchestrator<S, L, F>
where
    S: KvStore,
    L: CreditLedger,
    F: ForwardTransfer,
{
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn replay_ledger(&self) -> &ReplayLedger<S> {
        &self.replay
    }

    pub fn registration_ledger(&self) -> &ReplayLedger<S> {
        &self.registrations
    }

    pub fn forward_intents(&self) -> &ForwardIntentStore<S> {
        &self.intents
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn forwarder(&self) -> &F {
        &self.forwarder
    }

    /// Read-only lookups over the router's state
    pub fn query(&self) -> MintQuery<'_, S> {
        MintQuery::new(&self.replay, &self.intents)
    }

    /// Mints the burn carried by a relayed message.
    ///
    /// # Flow
    ///
    /// 1. Decode the envelope and the 132-byte burn body
    /// 2. Check versions and destination domain
    /// 3. Record (source domain, sender, nonce) in the replay ledger
    /// 4. Credit the recipient, rolling back step 3 if the credit fails
    /// 5. Start the forward registered for this mint, if any
    ///
    /// Steps 1 to 4 leave no state behind on failure. A redelivered message
    /// fails with [`RouterError::AlreadyProcessed`], which is an expected
    /// outcome rather than an anomaly. Nothing in step 5 can fail the mint.
    pub fn process_inbound_message(&mut self, bytes: &[u8]) -> Result<MintResult> {
        let span = spans::process_inbound_message(bytes.len());
        let _guard = span.enter();

        let result = self.mint(bytes);
        if let Err(ref e) = result {
            if !e.is_already_processed() {
                spans::record_error(e);
            }
        }
        result
    }

    /// Stores the forwarding instructions carried by a relayed message.
    ///
    /// The body is a [`ForwardMetadata`] record. The message is
    /// replay-protected in its own namespace, so a redelivered registration
    /// cannot overwrite an intent whose acknowledgment has since been
    /// recorded, and never reads as a mint.
    pub fn process_forward_registration(&mut self, bytes: &[u8]) -> Result<Registration> {
        let span = spans::process_forward_registration(bytes.len());
        let _guard = span.enter();

        let result = self.register_from_message(bytes);
        if let Err(ref e) = result {
            if !e.is_already_processed() {
                spans::record_error(e);
            }
        }
        result
    }

    /// Dispatches a relayed message by its body: burn bodies are minted,
    /// anything else is treated as a forward registration.
    ///
    /// A body is a burn when it is 132 bytes long and starts with the
    /// accepted burn body version. Other bodies that decode as
    /// [`ForwardMetadata`] are registrations, whatever their length. A
    /// 132-byte body that is neither goes down the burn path so its version
    /// error is reported.
    pub fn route_message(&mut self, bytes: &[u8]) -> Result<Routed> {
        let message = Message::decode(bytes)?;
        if self.is_burn(&message) {
            self.process_inbound_message(bytes).map(Routed::Minted)
        } else {
            self.process_forward_registration(bytes)
                .map(Routed::ForwardRegistered)
        }
    }

    /// Registers forwarding instructions directly, replacing any previous
    /// ones for the pair.
    ///
    /// If the burn named by `metadata.nonce` has already minted and not yet
    /// forwarded, its forward starts now with the minted amount. Problems in
    /// that step are logged and never fail the registration.
    pub fn register_forward(
        &mut self,
        domain_sender: DomainSender,
        metadata: ForwardMetadata,
    ) -> Result<Registration> {
        let intent = ForwardIntent::new(domain_sender, metadata);
        self.intents.put(&domain_sender, &intent)?;
        info!(
            domain_sender = %domain_sender,
            forward_nonce = intent.metadata.nonce,
            channel = %intent.metadata.channel,
            event = "forward_intent_registered"
        );

        let nonce = intent.metadata.nonce;
        let transfer = match self.replay.mint(&domain_sender, nonce) {
            Ok(Some(minted)) => {
                debug!(
                    domain_sender = %domain_sender,
                    nonce = nonce,
                    event = "forward_registered_after_mint"
                );
                self.forward(&domain_sender, nonce, minted.amount)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(
                    error = %e,
                    domain_sender = %domain_sender,
                    nonce = nonce,
                    event = "mint_record_unreadable"
                );
                None
            }
        };

        Ok(Registration {
            intent,
            forward_attempted: transfer.is_some(),
            transfer_id: transfer.flatten(),
        })
    }

    /// Records a failed forward acknowledgment against its intent.
    pub fn mark_ack_error(&mut self, domain_sender: &DomainSender) -> Result<()> {
        self.intents.mark_ack_error(domain_sender)
    }

    /// Handles the asynchronous outcome of a forward started by this router.
    ///
    /// Failures mark the intent's `ack_error`, but only while the stored
    /// intent is still the one the transfer was started for; an outcome for
    /// an intent that has since been replaced is logged and dropped.
    /// Credited funds stay with the recipient either way. An unknown
    /// transfer id is ignored.
    pub fn on_forward_acknowledgement(
        &mut self,
        transfer_id: TransferId,
        ack: ForwardAck,
    ) -> Result<()> {
        let span = spans::forward_acknowledgement(transfer_id, ack.as_str());
        let _guard = span.enter();

        let Some(InFlightTransfer {
            domain_sender,
            nonce,
        }) = self.intents.resolve_transfer(transfer_id)?
        else {
            warn!(
                transfer_id = %transfer_id,
                event = "acknowledgement_for_unknown_transfer"
            );
            return Ok(());
        };

        match ack {
            ForwardAck::Success => {
                info!(
                    transfer_id = %transfer_id,
                    domain_sender = %domain_sender,
                    nonce = nonce,
                    event = "forward_acknowledged"
                );
                return Ok(());
            }
            ForwardAck::Error { reason } => {
                warn!(
                    transfer_id = %transfer_id,
                    domain_sender = %domain_sender,
                    nonce = nonce,
                    reason = %reason,
                    event = "forward_ack_error"
                );
            }
            ForwardAck::Timeout => {
                warn!(
                    transfer_id = %transfer_id,
                    domain_sender = %domain_sender,
                    nonce = nonce,
                    event = "forward_timed_out"
                );
            }
        }
        self.intents.mark_ack_error_for(&domain_sender, nonce)?;
        Ok(())
    }

    fn mint(&mut self, bytes: &[u8]) -> Result<MintResult> {
        let message = Message::decode(bytes)?;
        let burn = BurnMessage::decode(&message.message_body)?;
        self.check_envelope(&message)?;
        self.check_body_version(burn.version)?;

        let domain_sender = DomainSender::new(message.source_domain, message.sender);
        self.replay.record_mint(
            &domain_sender,
            message.nonce,
            &burn.mint_recipient,
            burn.amount,
        )?;

        if let Err(e) = self.ledger.credit(&burn.mint_recipient, burn.amount) {
            error!(
                error = %e,
                domain_sender = %domain_sender,
                nonce = message.nonce,
                event = "credit_failed"
            );
            self.roll_back(Marker::Mint, &domain_sender, message.nonce)?;
            return Err(e);
        }

        info!(
            domain_sender = %domain_sender,
            nonce = message.nonce,
            recipient = %burn.mint_recipient,
            amount = %burn.amount,
            event = "mint_completed"
        );

        let transfer = self.forward(&domain_sender, message.nonce, burn.amount);

        Ok(MintResult {
            amount: burn.amount,
            recipient: burn.mint_recipient,
            source: domain_sender,
            nonce: message.nonce,
            forward_attempted: transfer.is_some(),
            transfer_id: transfer.flatten(),
        })
    }

    fn register_from_message(&mut self, bytes: &[u8]) -> Result<Registration> {
        let message = Message::decode(bytes)?;
        if message.message_body.is_empty() {
            return Err(DecodingError::malformed("forward metadata", "empty body").into());
        }
        let metadata = ForwardMetadata::decode(&message.message_body)?;
        self.check_envelope(&message)?;

        let domain_sender = DomainSender::new(message.source_domain, message.sender);
        self.registrations.record(&domain_sender, message.nonce)?;

        match self.register_forward(domain_sender, metadata) {
            Ok(registration) => Ok(registration),
            Err(e) => {
                self.roll_back(Marker::Registration, &domain_sender, message.nonce)?;
                Err(e)
            }
        }
    }

    /// Starts the registered forward for this mint, at most once per mint.
    ///
    /// Returns `None` when no forward was attempted and `Some(None)` when
    /// one was attempted but could not be started.
    fn forward(
        &mut self,
        domain_sender: &DomainSender,
        nonce: u64,
        amount: U256,
    ) -> Option<Option<TransferId>> {
        let intent = match self.intents.take_for_mint(domain_sender, nonce) {
            Ok(Some(intent)) => intent,
            Ok(None) => {
                debug!(
                    domain_sender = %domain_sender,
                    nonce = nonce,
                    event = "no_forward_registered"
                );
                return None;
            }
            Err(e) => {
                warn!(
                    error = %e,
                    domain_sender = %domain_sender,
                    event = "forward_intent_unreadable"
                );
                return None;
            }
        };

        if let Err(e) = self.intents.mark_forwarded(domain_sender, nonce) {
            warn!(
                error = %e,
                domain_sender = %domain_sender,
                nonce = nonce,
                event = "forward_marker_not_recorded"
            );
            return None;
        }

        let request = TransferRequest::from_metadata(&intent.metadata, amount);
        let span = spans::initiate_forward(
            domain_sender,
            nonce,
            request.port(),
            request.channel(),
            &amount,
        );
        let _guard = span.enter();

        match self.forwarder.initiate_transfer(&request) {
            Ok(transfer_id) => {
                if let Err(e) = self.intents.track_transfer(transfer_id, domain_sender, nonce) {
                    warn!(
                        error = %e,
                        transfer_id = %transfer_id,
                        event = "forward_tracking_failed"
                    );
                }
                info!(
                    transfer_id = %transfer_id,
                    receiver = %request.receiver(),
                    channel = %request.channel(),
                    event = "forward_initiated"
                );
                Some(Some(transfer_id))
            }
            Err(e) => {
                spans::record_error(&e);
                warn!(
                    error = %e,
                    domain_sender = %domain_sender,
                    event = "forward_initiation_failed"
                );
                if let Err(e) = self.intents.mark_ack_error_for(domain_sender, nonce) {
                    warn!(error = %e, event = "forward_ack_error_not_recorded");
                }
                Some(None)
            }
        }
    }

    fn is_burn(&self, message: &Message) -> bool {
        if !message.carries_burn() {
            return false;
        }
        match BurnMessage::decode(&message.message_body) {
            Ok(burn) if burn.version == self.config.message_body_version => true,
            _ => ForwardMetadata::decode(&message.message_body).is_err(),
        }
    }

    fn check_envelope(&self, message: &Message) -> Result<()> {
        if message.version != self.config.message_version {
            return Err(RouterError::UnsupportedVersion {
                kind: "message",
                expected: self.config.message_version,
                actual: message.version,
            });
        }
        if self.config.enforce_destination_domain
            && message.destination_domain != self.config.local_domain
        {
            return Err(RouterError::DestinationDomainMismatch {
                expected: self.config.local_domain.as_u32(),
                actual: message.destination_domain.as_u32(),
            });
        }
        Ok(())
    }

    fn check_body_version(&self, version: u32) -> Result<()> {
        if version != self.config.message_body_version {
            return Err(RouterError::UnsupportedVersion {
                kind: "message body",
                expected: self.config.message_body_version,
                actual: version,
            });
        }
        Ok(())
    }

    fn roll_back(
        &mut self,
        marker: Marker,
        domain_sender: &DomainSender,
        nonce: u64,
    ) -> Result<()> {
        let (ledger, context) = match marker {
            Marker::Mint => (&mut self.replay, "mint marker left without a matching credit"),
            Marker::Registration => (
                &mut self.registrations,
                "registration marker left without a stored intent",
            ),
        };
        if let Err(e) = ledger.roll_back(domain_sender, nonce) {
            spans::record_error_with_context(
                "ReplayRollbackFailed",
                &e.to_string(),
                Some(context),
            );
            error!(
                error = %e,
                domain_sender = %domain_sender,
                nonce = nonce,
                event = "replay_rollback_failed"
            );
            return Err(e);
        }
        debug!(
            domain_sender = %domain_sender,
            nonce = nonce,
            event = "replay_record_rolled_back"
        );
        Ok(())
    }
}

/// Which replay ledger a rollback applies to
#[derive(Debug, Clone, Copy)]
enum Marker {
    Mint,
    Registration,
}
