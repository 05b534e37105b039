// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;

use crate::error::{Result, RouterError};
use crate::protocol::DomainId;

/// Environment variable overriding [`RouterConfig::local_domain`]
pub const ENV_LOCAL_DOMAIN: &str = "CCTP_ROUTER_LOCAL_DOMAIN";
/// Environment variable overriding [`RouterConfig::message_version`]
pub const ENV_MESSAGE_VERSION: &str = "CCTP_ROUTER_MESSAGE_VERSION";
/// Environment variable overriding [`RouterConfig::message_body_version`]
pub const ENV_MESSAGE_BODY_VERSION: &str = "CCTP_ROUTER_MESSAGE_BODY_VERSION";
/// Environment variable overriding [`RouterConfig::enforce_destination_domain`]
pub const ENV_ENFORCE_DESTINATION_DOMAIN: &str = "CCTP_ROUTER_ENFORCE_DESTINATION_DOMAIN";

/// Acceptance rules for inbound messages.
///
/// # Examples
///
/// ```rust
/// use cctp_router::{DomainId, RouterConfig};
///
/// // Noble defaults: local domain 4, version 0 envelopes and bodies
/// let config = RouterConfig::default();
/// assert_eq!(config.local_domain, DomainId::NOBLE);
///
/// let config = RouterConfig::default()
///     .with_local_domain(DomainId::new(9))
///     .with_destination_domain_enforced(false);
/// assert!(!config.enforce_destination_domain);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Domain of the chain the router runs on.
    pub local_domain: DomainId,
    /// Envelope version accepted by the router.
    pub message_version: u32,
    /// Burn and forward body version accepted by the router.
    pub message_body_version: u32,
    /// Reject messages whose destination domain is not `local_domain`.
    pub enforce_destination_domain: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            local_domain: DomainId::NOBLE,
            message_version: 0,
            message_body_version: 0,
            enforce_destination_domain: true,
        }
    }
}

impl RouterConfig {
    pub fn with_local_domain(mut self, domain: DomainId) -> Self {
        self.local_domain = domain;
        self
    }

    pub fn with_message_version(mut self, version: u32) -> Self {
        self.message_version = version;
        self
    }

    pub fn with_message_body_version(mut self, version: u32) -> Self {
        self.message_body_version = version;
        self
    }

    pub fn with_destination_domain_enforced(mut self, enforce: bool) -> Self {
        self.enforce_destination_domain = enforce;
        self
    }

    /// Parses a JSON document; missing fields keep their defaults.
    ///
    /// ```rust
    /// use cctp_router::RouterConfig;
    ///
    /// let config = RouterConfig::from_json(r#"{ "local_domain": 7 }"#).unwrap();
    /// assert_eq!(config.local_domain.as_u32(), 7);
    /// assert_eq!(config.message_version, 0);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads overrides from the process environment, loading a `.env` file
    /// first if one exists. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| match dotenvy::var(name) {
            Ok(value) => Ok(Some(value)),
            Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)) => Ok(None),
            Err(e) => Err(RouterError::InvalidConfig(format!("{name}: {e}"))),
        })
    }

    fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Result<Option<String>>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_LOCAL_DOMAIN)? {
            config.local_domain = DomainId::new(parse_var(ENV_LOCAL_DOMAIN, &value)?);
        }
        if let Some(value) = lookup(ENV_MESSAGE_VERSION)? {
            config.message_version = parse_var(ENV_MESSAGE_VERSION, &value)?;
        }
        if let Some(value) = lookup(ENV_MESSAGE_BODY_VERSION)? {
            config.message_body_version = parse_var(ENV_MESSAGE_BODY_VERSION, &value)?;
        }
        if let Some(value) = lookup(ENV_ENFORCE_DESTINATION_DOMAIN)? {
            config.enforce_destination_domain = parse_var(ENV_ENFORCE_DESTINATION_DOMAIN, &value)?;
        }
        Ok(config)
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| RouterError::InvalidConfig(format!("{name}={value}: {e}")))
}
