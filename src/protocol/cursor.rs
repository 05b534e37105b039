// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Bounds-checked big-endian reader for fixed-offset wire formats.

use alloy_primitives::{FixedBytes, U256};

use crate::error::DecodingError;

/// Forward-only reader over externally supplied bytes.
///
/// Every read checks the remaining length first, so an offset error surfaces
/// as a [`DecodingError`] instead of a slice panic.
#[derive(Debug, Clone)]
pub(crate) struct ByteCursor<'a> {
    bytes: &'a [u8],
    position: usize,
    kind: &'static str,
}

impl<'a> ByteCursor<'a> {
    /// `kind` names the structure being decoded in error messages.
    pub(crate) fn new(bytes: &'a [u8], kind: &'static str) -> Self {
        Self {
            bytes,
            position: 0,
            kind,
        }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    pub(crate) fn read_slice(&mut self, len: usize) -> Result<&'a [u8], DecodingError> {
        if self.remaining() < len {
            return Err(DecodingError::malformed(
                self.kind,
                format!(
                    "need {len} bytes at offset {}, only {} remain",
                    self.position,
                    self.remaining()
                ),
            ));
        }
        let out = &self.bytes[self.position..self.position + len];
        self.position += len;
        Ok(out)
    }

    pub(crate) fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodingError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.read_slice(N)?);
        Ok(buf)
    }

    pub(crate) fn read_u32_be(&mut self) -> Result<u32, DecodingError> {
        self.read_array().map(u32::from_be_bytes)
    }

    pub(crate) fn read_u64_be(&mut self) -> Result<u64, DecodingError> {
        self.read_array().map(u64::from_be_bytes)
    }

    pub(crate) fn read_b32(&mut self) -> Result<FixedBytes<32>, DecodingError> {
        self.read_array().map(FixedBytes)
    }

    pub(crate) fn read_u256_be(&mut self) -> Result<U256, DecodingError> {
        self.read_array::<32>().map(U256::from_be_bytes)
    }

    /// Consumes everything that is left.
    pub(crate) fn read_rest(&mut self) -> &'a [u8] {
        let out = &self.bytes[self.position..];
        self.position = self.bytes.len();
        out
    }

    /// Fails unless the whole input has been consumed.
    pub(crate) fn finish(&self) -> Result<(), DecodingError> {
        match self.remaining() {
            0 => Ok(()),
            extra => Err(DecodingError::malformed(
                self.kind,
                format!("{extra} trailing bytes"),
            )),
        }
    }
}
