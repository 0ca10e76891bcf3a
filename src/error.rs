// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 rhythmcache

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: expected at least {expected} fields, found {found}")]
    InvalidRecord {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: invalid {field} {value:?}")]
    InvalidInteger {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("failed to locate any app partitions")]
    NoAppPartitions,

    #[error("all app partitions should be equal size: {name:?} is {found} bytes, expected {expected}")]
    PartitionSizeMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("failed to eliminate down to only one app partition: every app partition is erased")]
    NoProgrammedPartition,

    #[error("failed to eliminate down to only one app partition: {} are programmed ({})", .0.len(), .0.join(", "))]
    AmbiguousProgrammedPartitions(Vec<String>),

    #[error("written image {path:?} does not match the extracted partition")]
    VerificationFailed { path: PathBuf },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ExtractError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
