// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 rhythmcache

use crate::constants::{
    APP_PARTITION_TYPE, COMMENT_PREFIX, FIELD_SEPARATOR, MIN_APP_FIELDS, MIN_TYPED_FIELDS,
    NAME_FIELD, OFFSET_FIELD, SIZE_FIELD, SUBTYPE_FIELD, TYPE_FIELD,
};
use crate::error::{ExtractError, Result};
use std::fs;
use std::path::Path;

/// parses an integer the way partition tables write them:
/// `0x`/`0o`/`0b` prefixes select the base, anything else is decimal.
/// single `_` separators between digits are accepted.
pub fn parse_int(text: &str) -> Option<u64> {
    let text = text.strip_prefix('+').unwrap_or(text);

    let (radix, digits, prefixed) = match text.get(..2) {
        Some("0x") | Some("0X") => (16, &text[2..], true),
        Some("0o") | Some("0O") => (8, &text[2..], true),
        Some("0b") | Some("0B") => (2, &text[2..], true),
        _ => (10, text, false),
    };

    // a prefix may be followed by one separator, bare digits may not
    let digits = if prefixed {
        digits.strip_prefix('_').unwrap_or(digits)
    } else {
        digits
    };

    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') {
        return None;
    }
    if digits.contains("__") {
        return None;
    }

    let cleaned: String = digits.chars().filter(|&c| c != '_').collect();
    if !cleaned.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    // "010" is rejected rather than read as octal or decimal
    if radix == 10 && cleaned.starts_with('0') && !cleaned.trim_start_matches('0').is_empty() {
        return None;
    }

    u64::from_str_radix(&cleaned, radix).ok()
}

// unicode line boundaries; \r\n is folded into one below
const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// splits `text` into lines at any line break, with `\r\n` counting as one.
/// a trailing break does not produce an empty last line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !LINE_BREAKS.contains(&c) {
            continue;
        }
        lines.push(&text[start..idx]);
        start = idx + c.len_utf8();
        if c == '\r' && chars.peek().is_some_and(|&(_, next)| next == '\n') {
            chars.next();
            start += 1;
        }
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// byte range a partition occupies in the flash image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionRange {
    pub offset: u64,
    pub size: u64,
}

impl PartitionRange {
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.size)
    }
}

/// one row of the partition table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionEntry {
    line: usize,
    fields: Vec<String>,
}

impl PartitionEntry {
    fn parse(line: usize, raw: &str) -> Self {
        let fields = raw
            .trim()
            .split(FIELD_SEPARATOR)
            .map(|field| field.trim().to_string())
            .collect();
        Self { line, fields }
    }

    /// 1-based line number in the source file
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn name(&self) -> &str {
        self.field(NAME_FIELD).unwrap_or_default()
    }

    pub fn partition_type(&self) -> Option<&str> {
        self.field(TYPE_FIELD)
    }

    pub fn subtype(&self) -> Option<&str> {
        self.field(SUBTYPE_FIELD)
    }

    /// the type column, or an error for rows too short to carry one
    pub fn require_type(&self) -> Result<&str> {
        self.partition_type().ok_or(ExtractError::InvalidRecord {
            line: self.line,
            expected: MIN_TYPED_FIELDS,
            found: self.fields.len(),
        })
    }

    pub fn is_app(&self) -> bool {
        self.partition_type() == Some(APP_PARTITION_TYPE)
    }

    pub fn is_comment(&self) -> bool {
        self.name().starts_with(COMMENT_PREFIX)
    }

    /// blank lines split into a single empty field
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|field| field.is_empty())
    }

    fn integer_field(&self, index: usize, field: &'static str) -> Result<u64> {
        let value = self.field(index).ok_or(ExtractError::InvalidRecord {
            line: self.line,
            expected: MIN_APP_FIELDS,
            found: self.fields.len(),
        })?;

        parse_int(value).ok_or_else(|| ExtractError::InvalidInteger {
            line: self.line,
            field,
            value: value.to_string(),
        })
    }

    pub fn offset(&self) -> Result<u64> {
        self.integer_field(OFFSET_FIELD, "offset")
    }

    pub fn size(&self) -> Result<u64> {
        self.integer_field(SIZE_FIELD, "size")
    }

    pub fn range(&self) -> Result<PartitionRange> {
        if self.fields.len() < MIN_APP_FIELDS {
            return Err(ExtractError::InvalidRecord {
                line: self.line,
                expected: MIN_APP_FIELDS,
                found: self.fields.len(),
            });
        }

        Ok(PartitionRange {
            offset: self.offset()?,
            size: self.size()?,
        })
    }
}

/// a comma separated partition table, one partition per line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionTable {
    entries: Vec<PartitionEntry>,
}

impl PartitionTable {
    pub fn parse(text: &str) -> Self {
        let entries = split_lines(text)
            .into_iter()
            .enumerate()
            .map(|(idx, raw)| PartitionEntry::parse(idx + 1, raw))
            .collect();
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ExtractError::io(path, e))?;
        Ok(Self::parse(&text))
    }

    pub fn entries(&self) -> &[PartitionEntry] {
        &self.entries
    }

    /// rows worth showing to a user: no comments, no blank lines
    pub fn visible_entries(&self) -> impl Iterator<Item = &PartitionEntry> {
        self.entries
            .iter()
            .filter(|entry| !entry.is_comment() && !entry.is_blank())
    }

    pub fn app_entries(&self) -> impl Iterator<Item = &PartitionEntry> {
        self.entries.iter().filter(|entry| entry.is_app())
    }

    /// app rows in table order, failing at the first row without a type column
    pub fn typed_app_entries(&self) -> impl Iterator<Item = Result<&PartitionEntry>> {
        self.entries
            .iter()
            .filter_map(|entry| match entry.require_type() {
                Ok(APP_PARTITION_TYPE) => Some(Ok(entry)),
                Ok(_) => None,
                Err(e) => Some(Err(e)),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ESP_TABLE: &str = "\
# ESP-IDF Partition Table
# Name,   Type, SubType, Offset,   Size, Flags
nvs,      data, nvs,     0x9000,   0x4000,
otadata,  data, ota,     0xd000,   0x2000,
phy_init, data, phy,     0xf000,   0x1000,
ota_0,    app,  ota_0,   0x10000,  0x180000,
ota_1,    app,  ota_1,   0x190000, 0x180000,
";

    #[test]
    fn parses_integers_with_auto_base() {
        assert_eq!(parse_int("0x10000"), Some(0x10000));
        assert_eq!(parse_int("0XfF"), Some(255));
        assert_eq!(parse_int("4096"), Some(4096));
        assert_eq!(parse_int("0"), Some(0));
        assert_eq!(parse_int("000"), Some(0));
        assert_eq!(parse_int("0o17"), Some(15));
        assert_eq!(parse_int("0b101"), Some(5));
        assert_eq!(parse_int("1_000"), Some(1000));
        assert_eq!(parse_int("0x_10"), Some(16));
        assert_eq!(parse_int("+12"), Some(12));
    }

    #[test]
    fn rejects_malformed_integers() {
        for text in ["", "0x", "010", "1__0", "_1", "1_", "1M", "-16", "0xg", "12 34"] {
            assert_eq!(parse_int(text), None, "{text:?} should not parse");
        }
        assert_eq!(parse_int("0x1_0000_0000_0000_0000"), None);
    }

    #[test]
    fn splits_and_trims_fields() {
        let table = PartitionTable::parse(ESP_TABLE);
        assert_eq!(table.len(), 7);

        let ota_0 = &table.entries()[5];
        assert_eq!(ota_0.line(), 6);
        assert_eq!(ota_0.name(), "ota_0");
        assert_eq!(ota_0.partition_type(), Some("app"));
        assert_eq!(ota_0.subtype(), Some("ota_0"));
        assert_eq!(ota_0.fields().last().map(String::as_str), Some(""));
        assert_eq!(
            ota_0.range().unwrap(),
            PartitionRange {
                offset: 0x10000,
                size: 0x180000
            }
        );
    }

    #[test]
    fn selects_app_rows_only() {
        let table = PartitionTable::parse(ESP_TABLE);
        let names: Vec<&str> = table.app_entries().map(|e| e.name()).collect();
        assert_eq!(names, ["ota_0", "ota_1"]);
        assert_eq!(table.visible_entries().count(), 5);
    }

    #[test]
    fn blank_lines_are_rejected() {
        let table = PartitionTable::parse("a, app, ota_0, 0, 16\n\nb, app, ota_1, 16, 16\n");
        assert_eq!(table.len(), 3);
        assert!(table.entries()[1].is_blank());

        let rows: Vec<_> = table.typed_app_entries().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_ok());
        assert!(matches!(
            rows[1],
            Err(ExtractError::InvalidRecord {
                line: 2,
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn single_token_rows_have_no_type() {
        let table = PartitionTable::parse("partitions\n");
        assert!(matches!(
            table.entries()[0].require_type(),
            Err(ExtractError::InvalidRecord { line: 1, .. })
        ));
        assert_eq!(table.app_entries().count(), 0);
    }

    #[test]
    fn splits_on_every_line_ending() {
        assert_eq!(split_lines("a\nb\r\nc\rd"), ["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\r\n"), ["a"]);
        assert_eq!(split_lines("a\n\nb\n"), ["a", "", "b"]);
        assert_eq!(split_lines("a\r\rb"), ["a", "", "b"]);
        assert!(split_lines("").is_empty());

        let table = PartitionTable::parse("a, app, ota_0, 0, 16\rb, app, ota_1, 16, 16\r");
        let names: Vec<&str> = table.app_entries().map(|e| e.name()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn type_comparison_is_exact() {
        let table = PartitionTable::parse("a, APP, ota_0, 0, 16\nb,app ,ota_1,16,16\n");
        let names: Vec<&str> = table.app_entries().map(|e| e.name()).collect();
        assert_eq!(names, ["b"]);
    }

    #[test]
    fn short_app_row_is_an_error() {
        let table = PartitionTable::parse("ota_0, app, ota_0, 0x10000\n");
        let err = table.entries()[0].range().unwrap_err();
        assert!(matches!(
            err,
            ExtractError::InvalidRecord {
                line: 1,
                expected: 5,
                found: 4
            }
        ));
    }

    #[test]
    fn unparsable_size_reports_line_and_field() {
        let table = PartitionTable::parse("x,data,nvs,0,0\nfactory, app, factory, 0x10000, 1M\n");
        let err = table.entries()[1].range().unwrap_err();
        match err {
            ExtractError::InvalidInteger { line, field, value } => {
                assert_eq!(line, 2);
                assert_eq!(field, "size");
                assert_eq!(value, "1M");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn range_end_saturates() {
        let range = PartitionRange {
            offset: u64::MAX - 1,
            size: 16,
        };
        assert_eq!(range.end(), u64::MAX);
    }
}
