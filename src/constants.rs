// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 rhythmcache

/// value left behind by erased NOR flash
pub const ERASED_BYTE: u8 = 0xFF;

/// partition type of slots holding executable firmware
pub const APP_PARTITION_TYPE: &str = "app";

pub const FIELD_SEPARATOR: char = ',';
pub const COMMENT_PREFIX: char = '#';

// column layout of a partition table row:
// name, type, subtype, offset, size[, flags]
pub const NAME_FIELD: usize = 0;
pub const TYPE_FIELD: usize = 1;
pub const SUBTYPE_FIELD: usize = 2;
pub const OFFSET_FIELD: usize = 3;
pub const SIZE_FIELD: usize = 4;

/// fields every row needs to be classified by type
pub const MIN_TYPED_FIELDS: usize = TYPE_FIELD + 1;

/// fields an app row needs before its range can be resolved
pub const MIN_APP_FIELDS: usize = SIZE_FIELD + 1;

pub const HASH_BUFFER_SIZE: usize = 1024 * 1024; // 1MB buffer
