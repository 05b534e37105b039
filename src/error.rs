// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

use crate::protocol::DomainSender;

/// Failure to decode externally supplied bytes.
///
/// Decoding is all-or-nothing: no partially decoded value is ever returned
/// alongside this error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodingError {
    #[error("malformed {kind}: {reason}")]
    Malformed { kind: &'static str, reason: String },
}

impl DecodingError {
    pub(crate) fn malformed(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            kind,
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum RouterError {
    #[error("Decoding error: {0}")]
    Decoding(#[from] DecodingError),

    #[error("Message already processed: {domain_sender} nonce {nonce}")]
    AlreadyProcessed {
        domain_sender: DomainSender,
        nonce: u64,
    },

    #[error("Credit failed: {reason}")]
    CreditFailed { reason: String },

    #[error("Forward transfer failed: {reason}")]
    ForwardFailed { reason: String },

    #[error("Destination domain mismatch: expected {expected}, got {actual}")]
    DestinationDomainMismatch { expected: u32, actual: u32 },

    #[error("Unsupported {kind} version: expected {expected}, got {actual}")]
    UnsupportedVersion {
        kind: &'static str,
        expected: u32,
        actual: u32,
    },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Not found")]
    NotFound,

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RouterError {
    /// Returns true for the expected outcome of a redelivered message.
    pub fn is_already_processed(&self) -> bool {
        matches!(self, Self::AlreadyProcessed { .. })
    }
}

pub type Result<T> = std::result::Result<T, RouterError>;
