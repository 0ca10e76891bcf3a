// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 rhythmcache

use crate::cli::commands::list::render_partitions;
use crate::cli::ui::ui_print::UiOutput;
use indicatif::ProgressBar;
use ota_extract::utils::{format_offset, format_size};
use ota_extract::verify::VerificationStatus;
use ota_extract::{AppCandidate, ExtractionReporter, FirmwareImage, PartitionTable};
use std::path::Path;

/// reporter for extraction progress
pub struct CliExtractionReporter<'a> {
    ui: &'a UiOutput,
    spinner: Option<ProgressBar>,
    list: bool,
}

impl<'a> CliExtractionReporter<'a> {
    pub fn new(ui: &'a UiOutput, spinner: Option<ProgressBar>, list: bool) -> Self {
        Self { ui, spinner, list }
    }
}

// the trait lives in the library, this implementation lives in the cli
// layer and uses cli-specific ui components
impl ExtractionReporter for CliExtractionReporter<'_> {
    fn on_loaded(&self, table: &PartitionTable, image: &FirmwareImage) {
        self.ui.println(format!(
            "- Loaded image ({}) and {} partition table rows",
            format_size(image.len() as u64),
            table.len()
        ));
        if self.list {
            self.ui.output(render_partitions(table, image).trim_end());
        }
        self.ui.update_spinner(&self.spinner, "Locating app partitions...");
    }

    fn on_candidates(&self, _table: &PartitionTable, candidates: &[AppCandidate<'_>]) {
        self.ui.println(format!("- Found {} app partition(s)", candidates.len()));
    }

    fn on_selected(&self, candidate: &AppCandidate<'_>) {
        self.ui.println(format!(
            "- Selected {} at {} ({})",
            candidate.name(),
            format_offset(candidate.range.offset),
            format_size(candidate.data.len() as u64)
        ));
        self.ui.update_spinner(&self.spinner, "Writing image...");
    }

    fn on_written(&self, path: &Path, len: usize) {
        self.ui.println(format!("- Wrote {} to {:?}", format_size(len as u64), path));
    }

    fn on_verify_start(&self, path: &Path) {
        self.ui.update_spinner(&self.spinner, format!("Verifying {:?}...", path));
    }

    fn on_verified(&self, path: &Path, status: VerificationStatus) {
        match status {
            VerificationStatus::Verified => self.ui.println(format!("- ✓ {:?} verified", path)),
            VerificationStatus::Mismatch => self.ui.error(format!("✗ {:?} hash mismatch", path)),
            VerificationStatus::Skipped => self.ui.println(format!(
                "- Skipped verification of {:?} (not a regular file)",
                path
            )),
        }
    }
}
