// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 rhythmcache

use crate::constants::ERASED_BYTE;
use crate::error::{ExtractError, Result};
use crate::partition_table::PartitionRange;
use std::fs;
use std::path::Path;

/// true if every byte still holds the erased flash value.
/// an empty slice counts as erased.
pub fn is_erased(data: &[u8]) -> bool {
    data.iter().all(|&byte| byte == ERASED_BYTE)
}

/// a raw flash dump held fully in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirmwareImage {
    bytes: Vec<u8>,
}

impl FirmwareImage {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| ExtractError::io(path, e))?;
        Ok(Self::new(bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// bytes covered by `range`, clamped to the end of the image.
    /// a range starting past the end yields an empty slice.
    pub fn slice(&self, range: PartitionRange) -> &[u8] {
        let len = self.bytes.len();
        let start = usize::try_from(range.offset).unwrap_or(usize::MAX).min(len);
        let end = usize::try_from(range.end()).unwrap_or(usize::MAX).min(len);
        &self.bytes[start..end.max(start)]
    }
}

impl From<Vec<u8>> for FirmwareImage {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}
