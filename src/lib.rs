// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 rhythmcache

//! Pulls the programmed app partition out of an OTA-capable flash image.
//!
//! A flash image with two OTA slots normally has one of them erased. The
//! partition table locates the `app` slots; the slot whose bytes are not all
//! `0xFF` is the one that gets written out.

pub mod constants;
pub mod error;
pub mod extractor;
pub mod image;
pub mod metadata;
pub mod partition_table;
pub mod utils;
pub mod verify;

pub use error::{ExtractError, Result};
pub use extractor::{
    AppCandidate, ExtractionReporter, NoOpReporter, Selection, extract, select_app_partition,
};
pub use image::FirmwareImage;
pub use metadata::ExtractionReport;
pub use partition_table::{PartitionEntry, PartitionRange, PartitionTable};
