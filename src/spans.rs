// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! OpenTelemetry span helpers for router operations
//!
//! Static span names, structured attributes, and no business logic. The
//! orchestrator enters these spans internally; they are public so hosts can
//! wrap their own message handling in the same names.
//!
//! # Example
//!
//! ```rust
//! use cctp_router::spans;
//!
//! let span = spans::process_inbound_message(248);
//! let _guard = span.enter();
//! // decode and apply the message here
//! ```

use alloy_primitives::U256;
use tracing::Span;

use crate::protocol::DomainSender;
use crate::traits::TransferId;

/// Create span for processing one relayed burn message.
///
/// Parent: host transaction span
/// Children: cctp_router.initiate_forward
#[inline]
pub fn process_inbound_message(message_length: usize) -> Span {
    tracing::info_span!(
        "cctp_router.process_inbound_message",
        message_length_bytes = message_length,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for processing a message that registers forwarding
/// instructions.
///
/// Parent: host transaction span
/// Children: None
#[inline]
pub fn process_forward_registration(message_length: usize) -> Span {
    tracing::info_span!(
        "cctp_router.process_forward_registration",
        message_length_bytes = message_length,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for starting a forward transfer after a mint.
///
/// Parent: cctp_router.process_inbound_message
/// Children: host transfer module spans
#[inline]
pub fn initiate_forward(
    domain_sender: &DomainSender,
    nonce: u64,
    port: &str,
    channel: &str,
    amount: &U256,
) -> Span {
    tracing::debug_span!(
        "cctp_router.initiate_forward",
        domain_sender = %domain_sender,
        nonce = nonce,
        port = port,
        channel = channel,
        amount = %amount,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for handling a forward transfer acknowledgment.
///
/// Parent: host acknowledgment callback
/// Children: None
#[inline]
pub fn forward_acknowledgement(transfer_id: TransferId, outcome: &str) -> Span {
    tracing::info_span!(
        "cctp_router.forward_acknowledgement",
        transfer_id = %transfer_id,
        outcome = outcome,
    )
}

/// Record error attributes on the current span.
///
/// Follows OpenTelemetry semantic conventions for error tracking:
/// - error.type: The error type/variant
/// - error.message: Human-readable error message
/// - error.source: The underlying cause, if any
pub fn record_error<E: std::error::Error>(error: &E) {
    let current_span = tracing::Span::current();
    let message = error.to_string();
    current_span.record(
        "error.type",
        message.split(':').next().unwrap_or("Unknown"),
    );
    current_span.record("error.message", message.as_str());
    current_span.record("otel.status_code", "ERROR");

    if let Some(source) = error.source() {
        current_span.record("error.source", source.to_string());
    }
}

/// Record error attributes with a custom type name on the current span.
///
/// ```rust
/// use cctp_router::spans;
///
/// let span = spans::process_inbound_message(0);
/// let _guard = span.enter();
/// spans::record_error_with_context(
///     "ReplayRollbackFailed",
///     "could not remove mint marker",
///     Some("store rejected delete"),
/// );
/// ```
pub fn record_error_with_context(
    error_type: &str,
    error_message: &str,
    additional_context: Option<&str>,
) {
    let current_span = tracing::Span::current();
    current_span.record("error.type", error_type);
    current_span.record("error.message", error_message);
    current_span.record("otel.status_code", "ERROR");

    if let Some(context) = additional_context {
        current_span.record("error.source", context);
    }
}
