// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 rhythmcache

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use std::process;
use std::time::Instant;

use crate::cli::args::args_def::Args;
use crate::cli::commands::metadata_saver::{MetadataTarget, save_metadata};
use crate::cli::ui::cli_reporter::CliExtractionReporter;
use crate::cli::ui::ui_print::UiOutput;
use ota_extract::extract;
use ota_extract::utils::{format_elapsed_time, format_size};

/// exit status for a malformed invocation
const USAGE_EXIT_CODE: i32 = 1;

fn parse_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            process::exit(USAGE_EXIT_CODE);
        }
    }
}

pub fn run() -> Result<()> {
    let args = parse_args();

    let metadata_target = args.metadata_target();
    let is_stdout = matches!(metadata_target, Some(MetadataTarget::Stdout));
    let ui = UiOutput::new(args.quiet, is_stdout);

    let start_time = Instant::now();
    let main_pb = ui.create_spinner("Loading inputs...");
    let reporter = CliExtractionReporter::new(&ui, main_pb.clone(), args.list);

    let report = match extract(
        &args.image,
        &args.partitions,
        &args.out,
        !args.no_verify,
        &reporter,
    ) {
        Ok(report) => report,
        Err(e) => {
            ui.finish_spinner(main_pb, "Extraction failed");
            ui.clear()?;
            return Err(e).with_context(|| {
                format!(
                    "Failed to extract app partition from {:?} using {:?}",
                    args.image, args.partitions
                )
            });
        }
    };

    if let Some(target) = &metadata_target {
        ui.update_spinner(&main_pb, "Saving metadata...");
        if let Err(e) = save_metadata(&report, target) {
            ui.finish_spinner(main_pb, "Failed to save metadata");
            ui.clear()?;
            return Err(e);
        }
        if let MetadataTarget::File(path) = target {
            ui.println(format!("- Metadata saved to {:?}", path));
        }
    }

    let elapsed_time = format_elapsed_time(start_time.elapsed());
    ui.finish_spinner(
        main_pb,
        format!("Extracted {} (in {})", report.selected, elapsed_time),
    );
    ui.clear()?;

    ui.println(format!("- SHA-256: {}", report.sha256));
    ui.println(format!(
        "- Extraction completed in {}. Output: {:?} ({})",
        elapsed_time,
        report.output,
        format_size(report.output_size as u64)
    ));

    Ok(())
}
