// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{hex, FixedBytes};
use serde::{Deserialize, Serialize};

use super::DomainId;
use crate::error::DecodingError;

/// Composite of a source domain and the sender on that domain.
///
/// Together with a nonce this identifies an inbound message for replay
/// protection, and on its own it keys forwarding instructions.
///
/// The canonical byte form is the domain as a big-endian `u32` followed by
/// the 32-byte sender. The text form is `<domain>:0x<sender hex>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DomainSender {
    pub domain: DomainId,
    pub sender: FixedBytes<32>,
}

impl DomainSender {
    /// Size of the canonical byte form
    pub const SIZE: usize = 36;

    pub const fn new(domain: DomainId, sender: FixedBytes<32>) -> Self {
        Self { domain, sender }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[..4].copy_from_slice(&self.domain.as_u32().to_be_bytes());
        out[4..].copy_from_slice(self.sender.as_slice());
        out
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, DecodingError> {
        if bytes.len() != Self::SIZE {
            return Err(DecodingError::malformed(
                "domain sender",
                format!("expected {} bytes, got {}", Self::SIZE, bytes.len()),
            ));
        }
        let mut domain = [0u8; 4];
        domain.copy_from_slice(&bytes[..4]);
        let mut sender = [0u8; 32];
        sender.copy_from_slice(&bytes[4..]);
        Ok(Self {
            domain: DomainId::new(u32::from_be_bytes(domain)),
            sender: FixedBytes(sender),
        })
    }

    /// Canonical bytes followed by a big-endian nonce. Keys every
    /// per-message record.
    pub(crate) fn with_nonce(&self, nonce: u64) -> [u8; Self::SIZE + 8] {
        let mut out = [0u8; Self::SIZE + 8];
        out[..Self::SIZE].copy_from_slice(&self.to_bytes());
        out[Self::SIZE..].copy_from_slice(&nonce.to_be_bytes());
        out
    }

    /// Inverse of [`DomainSender::with_nonce`].
    pub(crate) fn split_nonce(bytes: &[u8]) -> Result<(Self, u64), DecodingError> {
        if bytes.len() != Self::SIZE + 8 {
            return Err(DecodingError::malformed(
                "domain sender nonce",
                format!("expected {} bytes, got {}", Self::SIZE + 8, bytes.len()),
            ));
        }
        let domain_sender = Self::from_slice(&bytes[..Self::SIZE])?;
        let mut nonce = [0u8; 8];
        nonce.copy_from_slice(&bytes[Self::SIZE..]);
        Ok((domain_sender, u64::from_be_bytes(nonce)))
    }
}

impl fmt::Display for DomainSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.domain.as_u32(),
            hex::encode_prefixed(self.sender)
        )
    }
}

impl FromStr for DomainSender {
    type Err = DecodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (domain, sender) = s.split_once(':').ok_or_else(|| {
            DecodingError::malformed("domain sender", "expected <domain>:<sender hex>")
        })?;
        let domain = domain
            .trim()
            .parse::<u32>()
            .map_err(|e| DecodingError::malformed("domain sender", format!("domain: {e}")))?;
        let sender = FixedBytes::<32>::from_str(sender.trim())
            .map_err(|e| DecodingError::malformed("domain sender", format!("sender: {e}")))?;
        Ok(Self::new(DomainId::new(domain), sender))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_layout() {
        let ds = DomainSender::new(DomainId::NOBLE, FixedBytes::from([9u8; 32]));
        let bytes = ds.to_bytes();

        assert_eq!(&bytes[..4], &[0, 0, 0, 4]);
        assert_eq!(&bytes[4..], &[9u8; 32]);
        assert_eq!(DomainSender::from_slice(&bytes).unwrap(), ds);
    }

    #[test]
    fn test_from_slice_wrong_length() {
        assert!(DomainSender::from_slice(&[0u8; 35]).is_err());
        assert!(DomainSender::from_slice(&[0u8; 37]).is_err());
    }

    #[test]
    fn test_nonce_suffix() {
        let ds = DomainSender::new(DomainId::BASE, FixedBytes::from([3u8; 32]));
        let bytes = ds.with_nonce(0x0102);

        assert_eq!(&bytes[..DomainSender::SIZE], &ds.to_bytes());
        assert_eq!(&bytes[DomainSender::SIZE..], &[0, 0, 0, 0, 0, 0, 1, 2]);
        assert_eq!(DomainSender::split_nonce(&bytes).unwrap(), (ds, 0x0102));
        assert!(DomainSender::split_nonce(&bytes[1..]).is_err());
    }

    #[test]
    fn test_text_form() {
        let ds = DomainSender::new(DomainId::ARBITRUM, FixedBytes::from([0xabu8; 32]));
        let text = ds.to_string();

        assert_eq!(text, format!("3:0x{}", "ab".repeat(32)));
        assert_eq!(text.parse::<DomainSender>().unwrap(), ds);
    }

    #[test]
    fn test_text_form_rejects_garbage() {
        assert!("no-separator".parse::<DomainSender>().is_err());
        assert!("x:0x00".parse::<DomainSender>().is_err());
        assert!("4:0x1234".parse::<DomainSender>().is_err());
    }
}
