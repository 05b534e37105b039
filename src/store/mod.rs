// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Key-value storage abstraction
//!
//! The router never owns a storage engine. Each component receives an
//! explicit store handle at construction and keeps its records under its own
//! key prefix through [`PrefixStore`]. All operations are synchronous: the
//! host applies one message at a time in consensus order.

mod memory;
mod prefix;

pub use memory::MemoryStore;
pub use prefix::PrefixStore;

use crate::error::Result;

/// Synchronous byte-keyed store consumed by the router.
///
/// Implementations wrap the host's state store. Errors are reported as
/// [`RouterError::Store`](crate::RouterError::Store) and abort the current
/// operation.
pub trait KvStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Returns true if a value is stored under `key`.
    fn has(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn delete(&mut self, key: &[u8]) -> Result<()>;
}
