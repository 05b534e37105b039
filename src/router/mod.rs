// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Mint orchestration for relayed burn messages
//!
//! This module ties decoding, replay protection, crediting, and forwarding
//! together into the operations a host calls when a message is delivered.

mod config;
mod orchestrator;
mod params;

pub use config::{
    RouterConfig, ENV_ENFORCE_DESTINATION_DOMAIN, ENV_LOCAL_DOMAIN, ENV_MESSAGE_BODY_VERSION,
    ENV_MESSAGE_VERSION,
};
pub use orchestrator::MintOrchestrator;
pub use params::{ForwardAck, MintResult, Registration, Routed, TransferRequest};
