// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! CCTP protocol types and wire codecs
//!
//! This module contains the byte-level formats the router consumes: the
//! fixed-offset message envelope and burn body, and the protobuf
//! forwarding metadata.

mod cursor;
mod domain_id;
mod domain_sender;
mod forward_metadata;
mod message;

pub use domain_id::DomainId;
pub use domain_sender::DomainSender;
pub use forward_metadata::{ForwardIntent, ForwardMetadata};
pub use message::{BurnMessage, Message};
