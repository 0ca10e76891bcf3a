// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 rhythmcache

use crate::error::{ExtractError, Result};
use crate::image::{FirmwareImage, is_erased};
use crate::metadata::ExtractionReport;
use crate::partition_table::{PartitionEntry, PartitionRange, PartitionTable};
use crate::verify::{VerificationStatus, sha256, verify_written};
use std::fs;
use std::path::Path;

/// progress reporting trait for an extraction run
/// implement this to receive updates as the pipeline advances
pub trait ExtractionReporter {
    /// called once both inputs are in memory
    fn on_loaded(&self, table: &PartitionTable, image: &FirmwareImage);

    /// called with every app partition before any of them is rejected
    fn on_candidates(&self, table: &PartitionTable, candidates: &[AppCandidate<'_>]);

    fn on_selected(&self, candidate: &AppCandidate<'_>);

    fn on_written(&self, path: &Path, len: usize);

    fn on_verify_start(&self, _path: &Path) {}

    fn on_verified(&self, _path: &Path, _status: VerificationStatus) {}
}

/// no-op reporter for headless/library use
pub struct NoOpReporter;

impl ExtractionReporter for NoOpReporter {
    fn on_loaded(&self, _: &PartitionTable, _: &FirmwareImage) {}
    fn on_candidates(&self, _: &PartitionTable, _: &[AppCandidate<'_>]) {}
    fn on_selected(&self, _: &AppCandidate<'_>) {}
    fn on_written(&self, _: &Path, _: usize) {}
}

/// an app partition together with the bytes it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppCandidate<'a> {
    pub entry: &'a PartitionEntry,
    pub range: PartitionRange,
    pub data: &'a [u8],
    pub erased: bool,
}

impl AppCandidate<'_> {
    pub fn name(&self) -> &str {
        self.entry.name()
    }
}

/// outcome of narrowing the app partitions down to one
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    candidates: Vec<AppCandidate<'a>>,
    selected: usize,
}

impl<'a> Selection<'a> {
    pub fn candidates(&self) -> &[AppCandidate<'a>] {
        &self.candidates
    }

    pub fn selected(&self) -> &AppCandidate<'a> {
        &self.candidates[self.selected]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }
}

/// resolves every app row of `table` to its slice of `image`.
/// ranges running past the image are truncated, not rejected.
/// a row without a type column fails the whole table.
pub fn app_candidates<'a>(
    image: &'a FirmwareImage,
    table: &'a PartitionTable,
) -> Result<Vec<AppCandidate<'a>>> {
    table
        .typed_app_entries()
        .map(|entry| {
            let entry = entry?;
            let range = entry.range()?;
            let data = image.slice(range);
            Ok(AppCandidate {
                entry,
                range,
                data,
                erased: is_erased(data),
            })
        })
        .collect()
}

/// picks the single programmed app partition out of `candidates`
pub fn select_from<'a>(candidates: Vec<AppCandidate<'a>>) -> Result<Selection<'a>> {
    let Some(first) = candidates.first() else {
        return Err(ExtractError::NoAppPartitions);
    };

    let expected = first.data.len();
    if let Some(odd) = candidates.iter().find(|c| c.data.len() != expected) {
        return Err(ExtractError::PartitionSizeMismatch {
            name: odd.name().to_string(),
            expected,
            found: odd.data.len(),
        });
    }

    let programmed: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.erased)
        .map(|(idx, _)| idx)
        .collect();

    match programmed.as_slice() {
        [] => Err(ExtractError::NoProgrammedPartition),
        [selected] => Ok(Selection {
            selected: *selected,
            candidates,
        }),
        _ => Err(ExtractError::AmbiguousProgrammedPartitions(
            programmed
                .iter()
                .map(|&idx| candidates[idx].name().to_string())
                .collect(),
        )),
    }
}

pub fn select_app_partition<'a>(
    image: &'a FirmwareImage,
    table: &'a PartitionTable,
) -> Result<Selection<'a>> {
    select_from(app_candidates(image, table)?)
}

/// re-reads the written output, returning whether it was actually checked.
/// devices and pipes (`/dev/null`, `/dev/stdout`) cannot be read back.
fn verify_output(
    output_path: &Path,
    digest: &[u8],
    reporter: &dyn ExtractionReporter,
) -> Result<bool> {
    let metadata = fs::metadata(output_path).map_err(|e| ExtractError::io(output_path, e))?;
    if !metadata.is_file() {
        reporter.on_verified(output_path, VerificationStatus::Skipped);
        return Ok(false);
    }

    reporter.on_verify_start(output_path);
    let status = verify_written(output_path, digest)?;
    reporter.on_verified(output_path, status);
    if status == VerificationStatus::Mismatch {
        return Err(ExtractError::VerificationFailed {
            path: output_path.to_path_buf(),
        });
    }
    Ok(true)
}

/// runs the whole pipeline: load both inputs, select the programmed app
/// partition and write it to `output_path`. nothing is written when
/// selection fails.
pub fn extract(
    image_path: &Path,
    table_path: &Path,
    output_path: &Path,
    verify: bool,
    reporter: &dyn ExtractionReporter,
) -> Result<ExtractionReport> {
    let image = FirmwareImage::load(image_path)?;
    let table = PartitionTable::load(table_path)?;
    reporter.on_loaded(&table, &image);

    let candidates = app_candidates(&image, &table)?;
    reporter.on_candidates(&table, &candidates);

    let selection = select_from(candidates)?;
    let selected = selection.selected();
    reporter.on_selected(selected);

    fs::write(output_path, selected.data).map_err(|e| ExtractError::io(output_path, e))?;
    reporter.on_written(output_path, selected.data.len());

    let digest = sha256(selected.data);
    let verified = verify && verify_output(output_path, &digest, reporter)?;

    Ok(ExtractionReport::new(
        image_path,
        table_path,
        output_path,
        &image,
        &selection,
        &digest,
        verified,
    ))
}
