// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use alloy_primitives::{FixedBytes, U256};
use bon::Builder;
use serde::Serialize;

use crate::protocol::{DomainSender, ForwardIntent, ForwardMetadata};
use crate::traits::TransferId;

/// Parameters of a forward transfer handed to
/// [`ForwardTransfer`](crate::ForwardTransfer)
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferRequest {
    #[builder(into)]
    port: String,
    #[builder(into)]
    channel: String,
    #[builder(into)]
    receiver: String,
    amount: U256,
    #[builder(into, default)]
    memo: String,
    #[builder(default)]
    timeout_in_nanoseconds: u64,
}

impl TransferRequest {
    /// Forwards `amount` as described by the depositor's metadata.
    pub fn from_metadata(metadata: &ForwardMetadata, amount: U256) -> Self {
        Self {
            port: metadata.port.clone(),
            channel: metadata.channel.clone(),
            receiver: metadata.destination_receiver.clone(),
            amount,
            memo: metadata.memo.clone(),
            timeout_in_nanoseconds: metadata.timeout_in_nanoseconds,
        }
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    pub fn amount(&self) -> U256 {
        self.amount
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    pub fn timeout_in_nanoseconds(&self) -> u64 {
        self.timeout_in_nanoseconds
    }
}

/// Outcome of a successfully processed burn message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MintResult {
    /// Amount credited to the recipient
    pub amount: U256,
    /// Account credited
    pub recipient: FixedBytes<32>,
    /// Origin of the message
    pub source: DomainSender,
    pub nonce: u64,
    /// True if registered forwarding instructions matched this mint
    pub forward_attempted: bool,
    /// Identifier of the started forward, if initiation succeeded
    pub transfer_id: Option<TransferId>,
}

/// Outcome of a stored forward registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub intent: ForwardIntent,
    /// True if the burn this intent belongs to had already minted and its
    /// forward was started right away
    pub forward_attempted: bool,
    /// Identifier of that forward, if initiation succeeded
    pub transfer_id: Option<TransferId>,
}

/// What [`MintOrchestrator::route_message`](crate::MintOrchestrator::route_message)
/// did with a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    Minted(MintResult),
    ForwardRegistered(Registration),
}

/// Asynchronous outcome of a forward transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardAck {
    Success,
    Error { reason: String },
    Timeout,
}

impl ForwardAck {
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Success)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error { .. } => "error",
            Self::Timeout => "timeout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_request_builder() {
        let request = TransferRequest::builder()
            .port("transfer")
            .channel("channel-1")
            .receiver("osmo1abc")
            .amount(U256::from(1000))
            .build();

        assert_eq!(request.port(), "transfer");
        assert_eq!(request.channel(), "channel-1");
        assert_eq!(request.receiver(), "osmo1abc");
        assert_eq!(request.amount(), U256::from(1000));
        assert_eq!(request.memo(), "");
        assert_eq!(request.timeout_in_nanoseconds(), 0);
    }

    #[test]
    fn test_transfer_request_from_metadata() {
        let metadata = ForwardMetadata {
            nonce: 3,
            port: "transfer".to_string(),
            channel: "channel-4".to_string(),
            destination_receiver: "cosmos1xyz".to_string(),
            memo: "note".to_string(),
            timeout_in_nanoseconds: 42,
        };
        let request = TransferRequest::from_metadata(&metadata, U256::from(55));

        let expected = TransferRequest::builder()
            .port("transfer")
            .channel("channel-4")
            .receiver("cosmos1xyz")
            .amount(U256::from(55))
            .memo("note")
            .timeout_in_nanoseconds(42)
            .build();
        assert_eq!(request, expected);
    }

    #[test]
    fn test_forward_ack_failure() {
        assert!(!ForwardAck::Success.is_failure());
        assert!(ForwardAck::Timeout.is_failure());
        assert!(ForwardAck::Error {
            reason: "denied".to_string()
        }
        .is_failure());
    }
}
