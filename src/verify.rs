// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 rhythmcache

use crate::constants::HASH_BUFFER_SIZE;
use crate::error::{ExtractError, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// result of comparing a written image against the bytes it should hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    Verified,
    Mismatch,
    /// the output is not a regular file and cannot be read back
    Skipped,
}

pub fn sha256(data: &[u8]) -> Vec<u8> {
    Sha256::digest(data).to_vec()
}

/// streams a file through SHA-256 without loading it whole
pub fn hash_file(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|e| ExtractError::io(path, e))?;

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; HASH_BUFFER_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(|e| ExtractError::io(path, e))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize().to_vec())
}

/// re-reads `path` and checks it hashes to `expected`
pub fn verify_written(path: &Path, expected: &[u8]) -> Result<VerificationStatus> {
    let hash = hash_file(path)?;
    if hash.as_slice() == expected {
        Ok(VerificationStatus::Verified)
    } else {
        Ok(VerificationStatus::Mismatch)
    }
}
