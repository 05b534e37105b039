// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! CCTP domain identifiers
//!
//! Circle's Cross-Chain Transfer Protocol identifies each participating network
//! by a numeric domain. The router must accept any `u32` on the wire (an
//! unknown domain is still a valid envelope), so [`DomainId`] is a transparent
//! newtype with named constants for the domains it knows about rather than a
//! closed enum.
//!
//! Reference: <https://developers.circle.com/stablecoins/supported-domains>

use std::fmt;

use serde::{Deserialize, Serialize};

/// CCTP domain identifier
///
/// # Example
///
/// ```rust
/// use cctp_router::DomainId;
///
/// let noble = DomainId::NOBLE;
/// let value: u32 = noble.into();
/// assert_eq!(value, 4);
/// assert_eq!(DomainId::from(4), DomainId::NOBLE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainId(u32);

impl DomainId {
    /// Ethereum mainnet and Sepolia testnet (Domain ID: 0)
    pub const ETHEREUM: Self = Self(0);
    /// Avalanche C-Chain (Domain ID: 1)
    pub const AVALANCHE: Self = Self(1);
    /// Optimism (Domain ID: 2)
    pub const OPTIMISM: Self = Self(2);
    /// Arbitrum One and Arbitrum Sepolia (Domain ID: 3)
    pub const ARBITRUM: Self = Self(3);
    /// Noble (Domain ID: 4), the default local domain of the router
    pub const NOBLE: Self = Self(4);
    /// Solana (Domain ID: 5)
    pub const SOLANA: Self = Self(5);
    /// Base and Base Sepolia (Domain ID: 6)
    pub const BASE: Self = Self(6);
    /// Polygon PoS (Domain ID: 7)
    pub const POLYGON: Self = Self(7);

    /// Wraps a raw domain value.
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the numeric domain ID value
    ///
    /// ```rust
    /// use cctp_router::DomainId;
    ///
    /// assert_eq!(DomainId::ETHEREUM.as_u32(), 0);
    /// assert_eq!(DomainId::NOBLE.as_u32(), 4);
    /// ```
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the chain name for well-known domains.
    #[inline]
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("Ethereum"),
            1 => Some("Avalanche"),
            2 => Some("Optimism"),
            3 => Some("Arbitrum"),
            4 => Some("Noble"),
            5 => Some("Solana"),
            6 => Some("Base"),
            7 => Some("Polygon"),
            _ => None,
        }
    }
}

impl From<DomainId> for u32 {
    #[inline]
    fn from(domain: DomainId) -> Self {
        domain.as_u32()
    }
}

impl From<u32> for DomainId {
    #[inline]
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", name, self.0),
            None => write!(f, "{}", self.0),
        }
    }
}
