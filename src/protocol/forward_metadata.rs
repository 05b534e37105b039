// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Forwarding instructions attached by a depositor
//!
//! A depositor can ask for minted funds to be sent on automatically, over an
//! IBC-style transfer, once the burn is minted. The instructions travel as a
//! [`ForwardMetadata`] record and are kept by the router as a
//! [`ForwardIntent`] until the matching mint arrives and its forward is
//! acknowledged.
//!
//! Both records are protobuf messages:
//!
//! | record              | field | name                   | wire     |
//! |---------------------|-------|------------------------|----------|
//! | `ForwardMetadata`   | 1     | nonce                  | uint64   |
//! |                     | 2     | port                   | string   |
//! |                     | 3     | channel                | string   |
//! |                     | 4     | destination_receiver   | string   |
//! |                     | 5     | memo                   | string   |
//! |                     | 6     | timeout_in_nanoseconds | uint64   |
//! | `ForwardIntent`     | 1     | source_domain          | uint32   |
//! |                     | 2     | source_domain_sender   | 36 bytes |
//! |                     | 3     | metadata               | message  |
//! |                     | 4     | ack_error              | bool     |
//!
//! # Canonicalization
//!
//! Encoded records may be compared or hashed, so only the canonical encoding
//! is accepted: fields in ascending order, each at most once, default values
//! omitted, minimal varints, no unknown fields. Decoding enforces this by
//! requiring the decoded record to re-encode to the input bytes.

use alloy_primitives::Bytes;
use prost::Message;
use serde::{Deserialize, Serialize};

use super::{DomainId, DomainSender};
use crate::error::DecodingError;

/// Where and how a minted amount should be forwarded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardMetadata {
    /// Nonce of the burn message these instructions belong to
    pub nonce: u64,
    pub port: String,
    pub channel: String,
    /// Receiver address on the forward destination, in its native format
    pub destination_receiver: String,
    pub memo: String,
    /// Relative timeout for the forward transfer; 0 means the transfer
    /// interface picks its default
    pub timeout_in_nanoseconds: u64,
}

/// Internal protobuf representation for `ForwardMetadata`.
#[derive(Clone, PartialEq, Message)]
struct ForwardMetadataProto {
    #[prost(uint64, tag = "1")]
    nonce: u64,
    #[prost(string, tag = "2")]
    port: String,
    #[prost(string, tag = "3")]
    channel: String,
    #[prost(string, tag = "4")]
    destination_receiver: String,
    #[prost(string, tag = "5")]
    memo: String,
    #[prost(uint64, tag = "6")]
    timeout_in_nanoseconds: u64,
}

impl ForwardMetadata {
    const KIND: &'static str = "forward metadata";

    /// Encodes the metadata in its canonical form
    pub fn encode(&self) -> Bytes {
        Bytes::from(self.to_proto().encode_to_vec())
    }

    /// Decodes canonically encoded metadata
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodingError> {
        let proto = ForwardMetadataProto::decode(bytes)
            .map_err(|e| DecodingError::malformed(Self::KIND, e.to_string()))?;
        let metadata = Self::from_proto(proto);
        ensure_canonical(Self::KIND, bytes, &metadata.to_proto().encode_to_vec())?;
        Ok(metadata)
    }

    fn to_proto(&self) -> ForwardMetadataProto {
        ForwardMetadataProto {
            nonce: self.nonce,
            port: self.port.clone(),
            channel: self.channel.clone(),
            destination_receiver: self.destination_receiver.clone(),
            memo: self.memo.clone(),
            timeout_in_nanoseconds: self.timeout_in_nanoseconds,
        }
    }

    fn from_proto(proto: ForwardMetadataProto) -> Self {
        Self {
            nonce: proto.nonce,
            port: proto.port,
            channel: proto.channel,
            destination_receiver: proto.destination_receiver,
            memo: proto.memo,
            timeout_in_nanoseconds: proto.timeout_in_nanoseconds,
        }
    }
}

/// Forwarding instructions registered for a (domain, sender) pair, plus the
/// outcome of the forward they triggered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardIntent {
    pub source_domain: DomainId,
    pub source_domain_sender: DomainSender,
    pub metadata: ForwardMetadata,
    /// Set once the forward's acknowledgment reports failure
    pub ack_error: bool,
}

/// Internal protobuf representation for `ForwardIntent`.
#[derive(Clone, PartialEq, Message)]
struct ForwardIntentProto {
    #[prost(uint32, tag = "1")]
    source_domain: u32,
    #[prost(bytes = "vec", tag = "2")]
    source_domain_sender: Vec<u8>,
    #[prost(message, optional, tag = "3")]
    metadata: Option<ForwardMetadataProto>,
    #[prost(bool, tag = "4")]
    ack_error: bool,
}

impl ForwardIntent {
    const KIND: &'static str = "forward intent";

    pub fn new(source_domain_sender: DomainSender, metadata: ForwardMetadata) -> Self {
        Self {
            source_domain: source_domain_sender.domain,
            source_domain_sender,
            metadata,
            ack_error: false,
        }
    }

    pub fn encode(&self) -> Bytes {
        Bytes::from(self.to_proto().encode_to_vec())
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DecodingError> {
        let proto = ForwardIntentProto::decode(bytes)
            .map_err(|e| DecodingError::malformed(Self::KIND, e.to_string()))?;
        let intent = Self::from_proto(proto)?;
        ensure_canonical(Self::KIND, bytes, &intent.to_proto().encode_to_vec())?;
        Ok(intent)
    }

    fn to_proto(&self) -> ForwardIntentProto {
        // An empty embedded message is a default value and is omitted.
        let metadata = (self.metadata != ForwardMetadata::default())
            .then(|| self.metadata.to_proto());
        ForwardIntentProto {
            source_domain: self.source_domain.as_u32(),
            source_domain_sender: self.source_domain_sender.to_bytes().to_vec(),
            metadata,
            ack_error: self.ack_error,
        }
    }

    fn from_proto(proto: ForwardIntentProto) -> Result<Self, DecodingError> {
        if proto.source_domain_sender.is_empty() {
            return Err(DecodingError::malformed(
                Self::KIND,
                "missing source domain sender",
            ));
        }
        let source_domain = DomainId::new(proto.source_domain);
        let source_domain_sender = DomainSender::from_slice(&proto.source_domain_sender)?;
        if source_domain_sender.domain != source_domain {
            return Err(DecodingError::malformed(
                Self::KIND,
                format!(
                    "source domain {} does not match sender domain {}",
                    source_domain.as_u32(),
                    source_domain_sender.domain.as_u32()
                ),
            ));
        }

        Ok(Self {
            source_domain,
            source_domain_sender,
            metadata: proto
                .metadata
                .map(ForwardMetadata::from_proto)
                .unwrap_or_default(),
            ack_error: proto.ack_error,
        })
    }
}

fn ensure_canonical(
    kind: &'static str,
    input: &[u8],
    canonical: &[u8],
) -> Result<(), DecodingError> {
    if input != canonical {
        return Err(DecodingError::malformed(
            kind,
            "encoding is not in canonical form",
        ));
    }
    Ok(())
}
