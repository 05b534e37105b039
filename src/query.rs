// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Read-only lookups over router state
//!
//! Arguments arrive as text, the way an operator or a host query endpoint
//! supplies them, and results render as JSON.
//!
//! ```rust
//! use cctp_router::testing::{FakeCreditLedger, FakeForwardTransfer};
//! use cctp_router::{MemoryStore, MintOrchestrator, RouterConfig, RouterError};
//!
//! let router = MintOrchestrator::with_store(
//!     RouterConfig::default(),
//!     MemoryStore::new(),
//!     FakeCreditLedger::new(),
//!     FakeForwardTransfer::new(),
//! );
//! let sender = format!("0:0x{}", "11".repeat(32));
//! let err = router.query().show_mint(&sender, "7").unwrap_err();
//! assert!(matches!(err, RouterError::NotFound));
//! ```

use serde::Serialize;

use crate::error::{Result, RouterError};
use crate::forward::ForwardIntentStore;
use crate::protocol::{DomainSender, ForwardIntent};
use crate::replay::{MintRecord, ReplayLedger};
use crate::store::KvStore;

/// Borrowed view of the replay ledger and the forward intents.
pub struct MintQuery<'a, S> {
    replay: &'a ReplayLedger<S>,
    intents: &'a ForwardIntentStore<S>,
}

impl<'a, S: KvStore> MintQuery<'a, S> {
    pub fn new(replay: &'a ReplayLedger<S>, intents: &'a ForwardIntentStore<S>) -> Self {
        Self { replay, intents }
    }

    /// Looks up the mint record for `"<domain>:0x<sender>"` and a decimal
    /// nonce. Registration messages are not mints and are never found here.
    pub fn show_mint(&self, source_domain_sender: &str, nonce: &str) -> Result<MintRecord> {
        let domain_sender = parse_domain_sender(source_domain_sender)?;
        let nonce = nonce
            .trim()
            .parse::<u64>()
            .map_err(|e| RouterError::InvalidQuery(format!("nonce {nonce:?}: {e}")))?;
        self.replay
            .mint(&domain_sender, nonce)?
            .ok_or(RouterError::NotFound)
    }

    /// Looks up the forward intent registered for `"<domain>:0x<sender>"`.
    pub fn show_forward(&self, source_domain_sender: &str) -> Result<ForwardIntent> {
        let domain_sender = parse_domain_sender(source_domain_sender)?;
        self.intents
            .get(&domain_sender)?
            .ok_or(RouterError::NotFound)
    }
}

/// Renders a query result as pretty-printed JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn parse_domain_sender(text: &str) -> Result<DomainSender> {
    text.parse()
        .map_err(|e| RouterError::InvalidQuery(format!("{text:?}: {e}")))
}
