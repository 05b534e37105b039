// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! CCTP v1 message format types
//!
//! A relayed message is a fixed 116-byte header followed by a variable body.
//! For token transfers the body is a fixed 132-byte burn message.
//!
//! Reference: <https://developers.circle.com/stablecoins/message-format>

use alloy_primitives::{Bytes, FixedBytes, U256};

use super::cursor::ByteCursor;
use super::DomainId;
use crate::error::DecodingError;

/// CCTP message envelope
///
/// # Format
///
/// - version: uint32 (4 bytes)
/// - sourceDomain: uint32 (4 bytes)
/// - destinationDomain: uint32 (4 bytes)
/// - nonce: uint64 (8 bytes)
/// - sender: bytes32 (32 bytes)
/// - recipient: bytes32 (32 bytes)
/// - destinationCaller: bytes32 (32 bytes)
/// - messageBody: dynamic bytes
///
/// Header size: 4 + 4 + 4 + 8 + 32 + 32 + 32 = 116 bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message format version
    pub version: u32,
    /// Domain the message was sent from
    pub source_domain: DomainId,
    /// Domain the message is addressed to
    pub destination_domain: DomainId,
    /// Per-source sequence number
    pub nonce: u64,
    /// Contract that sent the message (padded to 32 bytes)
    pub sender: FixedBytes<32>,
    /// Handler of the message on the destination domain
    pub recipient: FixedBytes<32>,
    /// Caller authorized to deliver the message (0 = anyone)
    pub destination_caller: FixedBytes<32>,
    /// Application payload, possibly empty
    pub message_body: Bytes,
}

impl Message {
    /// Size of the fixed header in bytes
    pub const HEADER_SIZE: usize = 116;

    /// Encodes the message to bytes
    pub fn encode(&self) -> Bytes {
        let mut bytes = Vec::with_capacity(Self::HEADER_SIZE + self.message_body.len());

        bytes.extend_from_slice(&self.version.to_be_bytes());
        bytes.extend_from_slice(&self.source_domain.as_u32().to_be_bytes());
        bytes.extend_from_slice(&self.destination_domain.as_u32().to_be_bytes());
        bytes.extend_from_slice(&self.nonce.to_be_bytes());
        bytes.extend_from_slice(self.sender.as_slice());
        bytes.extend_from_slice(self.recipient.as_slice());
        bytes.extend_from_slice(self.destination_caller.as_slice());
        bytes.extend_from_slice(&self.message_body);

        Bytes::from(bytes)
    }

    /// Decodes a message from bytes
    ///
    /// Fails if the input is shorter than [`Message::HEADER_SIZE`]. Everything
    /// after the header is the body.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodingError> {
        if bytes.len() < Self::HEADER_SIZE {
            return Err(DecodingError::malformed(
                "message",
                format!(
                    "expected at least {} bytes, got {}",
                    Self::HEADER_SIZE,
                    bytes.len()
                ),
            ));
        }

        let mut cursor = ByteCursor::new(bytes, "message");
        let version = cursor.read_u32_be()?;
        let source_domain = DomainId::new(cursor.read_u32_be()?);
        let destination_domain = DomainId::new(cursor.read_u32_be()?);
        let nonce = cursor.read_u64_be()?;
        let sender = cursor.read_b32()?;
        let recipient = cursor.read_b32()?;
        let destination_caller = cursor.read_b32()?;
        let message_body = Bytes::copy_from_slice(cursor.read_rest());

        Ok(Self {
            version,
            source_domain,
            destination_domain,
            nonce,
            sender,
            recipient,
            destination_caller,
            message_body,
        })
    }

    /// Returns true if the body has exactly the size of a burn message
    pub fn carries_burn(&self) -> bool {
        self.message_body.len() == BurnMessage::SIZE
    }
}

/// CCTP v1 burn message body
///
/// # Format
///
/// - version: uint32 (4 bytes)
/// - burnToken: bytes32 (32 bytes) - token burned on the source domain
/// - mintRecipient: bytes32 (32 bytes) - account credited on this domain
/// - amount: uint256 (32 bytes)
/// - messageSender: bytes32 (32 bytes) - depositor on the source domain
///
/// Total size: 4 + 32 + 32 + 32 + 32 = 132 bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurnMessage {
    /// Message body version
    pub version: u32,
    /// Token burned on the source domain
    pub burn_token: FixedBytes<32>,
    /// Account that receives the minted tokens
    pub mint_recipient: FixedBytes<32>,
    /// Amount burned, in the token's smallest unit
    pub amount: U256,
    /// Original depositor
    pub message_sender: FixedBytes<32>,
}

impl BurnMessage {
    /// Exact size of an encoded burn message
    pub const SIZE: usize = 132;

    /// Creates a version 0 burn message
    pub fn new(
        burn_token: FixedBytes<32>,
        mint_recipient: FixedBytes<32>,
        amount: U256,
        message_sender: FixedBytes<32>,
    ) -> Self {
        Self {
            version: 0,
            burn_token,
            mint_recipient,
            amount,
            message_sender,
        }
    }

    /// Sets the body version
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn encode(&self) -> Bytes {
        let mut bytes = Vec::with_capacity(Self::SIZE);

        bytes.extend_from_slice(&self.version.to_be_bytes());
        bytes.extend_from_slice(self.burn_token.as_slice());
        bytes.extend_from_slice(self.mint_recipient.as_slice());
        bytes.extend_from_slice(&self.amount.to_be_bytes::<32>());
        bytes.extend_from_slice(self.message_sender.as_slice());

        Bytes::from(bytes)
    }

    /// Decodes a burn message, failing unless the input is exactly
    /// [`BurnMessage::SIZE`] bytes
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodingError> {
        if bytes.len() != Self::SIZE {
            return Err(DecodingError::malformed(
                "burn message",
                format!("expected {} bytes, got {}", Self::SIZE, bytes.len()),
            ));
        }

        let mut cursor = ByteCursor::new(bytes, "burn message");
        let message = Self {
            version: cursor.read_u32_be()?,
            burn_token: cursor.read_b32()?,
            mint_recipient: cursor.read_b32()?,
            amount: cursor.read_u256_be()?,
            message_sender: cursor.read_b32()?,
        };
        cursor.finish()?;

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::hex;
    use rstest::rstest;

    fn sample_message(body: Vec<u8>) -> Message {
        Message {
            version: 0,
            source_domain: DomainId::ETHEREUM,
            destination_domain: DomainId::NOBLE,
            nonce: 0x0102_0304_0506_0708,
            sender: FixedBytes::from([0x11u8; 32]),
            recipient: FixedBytes::from([0x22u8; 32]),
            destination_caller: FixedBytes::ZERO,
            message_body: Bytes::from(body),
        }
    }

    fn example_burn_bytes() -> Vec<u8> {
        let mut bytes = vec![0u8; BurnMessage::SIZE];
        bytes[36..68].copy_from_slice(&[0xabu8; 32]);
        bytes[99] = 100;
        bytes
    }

    #[test]
    fn test_header_size() {
        assert_eq!(Message::HEADER_SIZE, 116);
        assert_eq!(BurnMessage::SIZE, 132);
    }

    #[test]
    fn test_message_field_offsets() {
        let encoded = sample_message(vec![0xee]).encode();

        assert_eq!(&encoded[0..4], &[0, 0, 0, 0]);
        assert_eq!(&encoded[4..8], &[0, 0, 0, 0]);
        assert_eq!(&encoded[8..12], &[0, 0, 0, 4]);
        assert_eq!(&encoded[12..20], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(&encoded[20..52], &[0x11u8; 32]);
        assert_eq!(&encoded[52..84], &[0x22u8; 32]);
        assert_eq!(&encoded[84..116], &[0u8; 32]);
        assert_eq!(&encoded[116..], &[0xee]);
    }

    #[rstest]
    #[case::empty_body(vec![])]
    #[case::burn_body(example_burn_bytes())]
    #[case::large_body(vec![7u8; 4096])]
    fn test_message_encode_decode(#[case] body: Vec<u8>) {
        let message = sample_message(body);
        let encoded = message.encode();

        let decoded = Message::decode(&encoded).expect("should decode");
        assert_eq!(decoded, message);
        assert_eq!(decoded.encode(), encoded);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(20)]
    #[case(115)]
    fn test_message_decode_too_short(#[case] len: usize) {
        let err = Message::decode(&vec![0u8; len]).unwrap_err();
        assert!(matches!(err, DecodingError::Malformed { kind: "message", .. }));
    }

    #[test]
    fn test_message_exact_header_has_empty_body() {
        let decoded = Message::decode(&[0u8; Message::HEADER_SIZE]).unwrap();
        assert!(decoded.message_body.is_empty());
        assert!(!decoded.carries_burn());
    }

    #[test]
    fn test_burn_message_example_decodes_amount() {
        let bytes = example_burn_bytes();
        let burn = BurnMessage::decode(&bytes).unwrap();

        assert_eq!(burn.version, 0);
        assert_eq!(burn.burn_token, FixedBytes::<32>::ZERO);
        assert_eq!(burn.mint_recipient, FixedBytes::from([0xabu8; 32]));
        assert_eq!(burn.amount, U256::from(100u64));
        assert_eq!(burn.message_sender, FixedBytes::<32>::ZERO);
        assert_eq!(burn.encode().as_ref(), bytes.as_slice());
    }

    #[test]
    fn test_burn_message_truncated_or_padded_fails() {
        let bytes = example_burn_bytes();
        assert!(BurnMessage::decode(&bytes[..131]).is_err());

        let mut padded = bytes.clone();
        padded.push(0);
        assert!(BurnMessage::decode(&padded).is_err());
    }

    #[rstest]
    #[case(0)]
    #[case(4)]
    #[case(100)]
    #[case(131)]
    #[case(133)]
    #[case(264)]
    fn test_burn_message_wrong_length(#[case] len: usize) {
        let err = BurnMessage::decode(&vec![0u8; len]).unwrap_err();
        assert!(matches!(
            err,
            DecodingError::Malformed {
                kind: "burn message",
                ..
            }
        ));
    }

    #[test]
    fn test_burn_message_max_amount() {
        let burn = BurnMessage::new(
            FixedBytes::from([1u8; 32]),
            FixedBytes::from([2u8; 32]),
            U256::MAX,
            FixedBytes::from([3u8; 32]),
        );
        let encoded = burn.encode();
        assert_eq!(&encoded[68..100], &[0xffu8; 32]);

        let decoded = BurnMessage::decode(&encoded).unwrap();
        assert_eq!(decoded.amount, U256::MAX);
        assert_eq!(decoded, burn);
    }

    #[test]
    fn test_burn_message_encoding_snapshot() {
        let burn = BurnMessage::new(
            FixedBytes::ZERO,
            FixedBytes::from([0xabu8; 32]),
            U256::from(1_000_000u64),
            FixedBytes::ZERO,
        )
        .with_version(1);

        insta::assert_snapshot!(
            hex::encode(&burn.encode()[..4]),
            @"00000001"
        );
        insta::assert_snapshot!(
            hex::encode(&burn.encode()[68..100]),
            @"00000000000000000000000000000000000000000000000000000000000f4240"
        );
    }
}
