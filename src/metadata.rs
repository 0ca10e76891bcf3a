// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 rhythmcache

use crate::error::Result;
use crate::extractor::Selection;
use crate::image::FirmwareImage;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateInfo {
    pub name: String,
    pub subtype: Option<String>,
    pub line: usize,
    pub offset: u64,
    /// size declared in the partition table
    pub size: u64,
    /// bytes actually present in the image
    pub length: usize,
    pub erased: bool,
    pub selected: bool,
}

/// summary of a finished extraction, serialized for `--metadata`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    pub image: PathBuf,
    pub partition_table: PathBuf,
    pub output: PathBuf,
    pub image_size: usize,
    pub candidates: Vec<CandidateInfo>,
    pub selected: String,
    pub output_size: usize,
    pub sha256: String,
    pub verified: bool,
}

impl ExtractionReport {
    pub fn new(
        image_path: &Path,
        table_path: &Path,
        output_path: &Path,
        image: &FirmwareImage,
        selection: &Selection<'_>,
        digest: &[u8],
        verified: bool,
    ) -> Self {
        let candidates = selection
            .candidates()
            .iter()
            .enumerate()
            .map(|(idx, c)| CandidateInfo {
                name: c.name().to_string(),
                subtype: c.entry.subtype().map(str::to_string),
                line: c.entry.line(),
                offset: c.range.offset,
                size: c.range.size,
                length: c.data.len(),
                erased: c.erased,
                selected: idx == selection.selected_index(),
            })
            .collect();

        Self {
            image: image_path.to_path_buf(),
            partition_table: table_path.to_path_buf(),
            output: output_path.to_path_buf(),
            image_size: image.len(),
            candidates,
            selected: selection.selected().name().to_string(),
            output_size: selection.selected().data.len(),
            sha256: hex::encode(digest),
            verified,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
