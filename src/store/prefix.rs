// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use super::KvStore;
use crate::error::Result;

/// Namespaces every key of an inner store under a fixed prefix.
#[derive(Clone, Debug)]
pub struct PrefixStore<S> {
    prefix: &'static [u8],
    inner: S,
}

impl<S: KvStore> PrefixStore<S> {
    pub fn new(prefix: &'static [u8], inner: S) -> Self {
        Self { prefix, inner }
    }

    pub fn prefix(&self) -> &'static [u8] {
        self.prefix
    }

    fn full_key(&self, key: &[u8]) -> Vec<u8> {
        let mut full = Vec::with_capacity(self.prefix.len() + key.len());
        full.extend_from_slice(self.prefix);
        full.extend_from_slice(key);
        full
    }
}

impl<S: KvStore> KvStore for PrefixStore<S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.inner.get(&self.full_key(key))
    }

    fn has(&self, key: &[u8]) -> Result<bool> {
        self.inner.has(&self.full_key(key))
    }

    fn set(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let full = self.full_key(key);
        self.inner.set(&full, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        let full = self.full_key(key);
        self.inner.delete(&full)
    }
}
