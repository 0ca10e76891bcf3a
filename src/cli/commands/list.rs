// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 rhythmcache

use ota_extract::FirmwareImage;
use ota_extract::constants::{OFFSET_FIELD, SIZE_FIELD};
use ota_extract::image::is_erased;
use ota_extract::partition_table::{PartitionEntry, PartitionTable, parse_int};
use ota_extract::utils::{format_offset, format_size};
use std::fmt::Write;

fn offset_column(entry: &PartitionEntry) -> String {
    let raw = entry.field(OFFSET_FIELD).unwrap_or_default();
    parse_int(raw).map(format_offset).unwrap_or_else(|| raw.to_string())
}

fn size_column(entry: &PartitionEntry) -> String {
    let raw = entry.field(SIZE_FIELD).unwrap_or_default();
    parse_int(raw).map(format_size).unwrap_or_else(|| raw.to_string())
}

fn state_column(entry: &PartitionEntry, image: &FirmwareImage) -> &'static str {
    if entry.require_type().is_err() {
        return "invalid";
    }
    if !entry.is_app() {
        return "";
    }
    match entry.range() {
        Ok(range) if is_erased(image.slice(range)) => "erased",
        Ok(_) => "programmed",
        Err(_) => "invalid",
    }
}

/// renders the partition table with the state of every app slot.
/// works row by row so a bad row does not hide the rest of the table.
pub fn render_partitions(table: &PartitionTable, image: &FirmwareImage) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16} {:<6} {:<10} {:<12} {:<12} {}",
        "Name", "Type", "SubType", "Offset", "Size", "State"
    );
    let _ = writeln!(out, "{}", "-".repeat(70));

    for entry in table.visible_entries() {
        let _ = writeln!(
            out,
            "{:<16} {:<6} {:<10} {:<12} {:<12} {}",
            entry.name(),
            entry.partition_type().unwrap_or_default(),
            entry.subtype().unwrap_or_default(),
            offset_column(entry),
            size_column(entry),
            state_column(entry, image)
        );
    }

    out
}
