// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 rhythmcache

use anyhow::{Context, Result};
use ota_extract::ExtractionReport;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// where `--metadata` output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataTarget {
    Stdout,
    File(PathBuf),
}

impl MetadataTarget {
    /// `None` means the flag was given without a value
    pub fn resolve(requested: Option<&Path>, image_out: &Path) -> Self {
        match requested {
            Some(path) if path == Path::new("-") => Self::Stdout,
            Some(path) => Self::File(path.to_path_buf()),
            None => {
                let mut sibling = image_out.as_os_str().to_owned();
                sibling.push(".json");
                Self::File(PathBuf::from(sibling))
            }
        }
    }
}

/// serializes the extraction report and writes it to `target`
pub fn save_metadata(report: &ExtractionReport, target: &MetadataTarget) -> Result<()> {
    let json_output = report
        .to_json_pretty()
        .context("Failed to serialize metadata")?;

    match target {
        MetadataTarget::Stdout => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json_output).context("Failed to write metadata to stdout")?;
            stdout.flush().context("Failed to flush stdout")?;
        }
        MetadataTarget::File(path) => {
            fs::write(path, json_output)
                .with_context(|| format!("Failed to write metadata file {:?}", path))?;
        }
    }

    Ok(())
}
