//! Delimited-text roster parser.
//!
//! This is a line/delimiter splitter, not a CSV grammar: quoted fields and
//! delimiters embedded in values are not supported.

use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::model::{Record, Roster};

use super::options::RosterOptions;

const UTF8_BOM: char = '\u{FEFF}';

/// Roster parser.
#[derive(Debug, Clone, Default)]
pub struct RosterParser {
    options: RosterOptions,
}

impl RosterParser {
    /// Create a parser with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom options.
    pub fn with_options(options: RosterOptions) -> Self {
        Self { options }
    }

    /// Parse roster text.
    pub fn parse(&self, text: &str) -> Result<Roster> {
        let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);
        let mut lines = text.lines().map(|l| l.trim_end_matches('\r'));

        let header_line = lines
            .by_ref()
            .find(|l| !l.trim().is_empty())
            .ok_or_else(|| Error::MalformedInput("input is empty".to_string()))?;

        let headers = self.parse_headers(header_line)?;

        let mut records = Vec::new();
        for (offset, line) in lines.enumerate() {
            if line.trim().is_empty() && self.options.skip_blank_lines {
                continue;
            }
            let cells = self.split(line);
            if cells.len() > headers.len() {
                log::debug!(
                    "Roster line {} has {} cells, expected {}; extra cells dropped",
                    offset + 2,
                    cells.len(),
                    headers.len()
                );
            }
            records.push(Record::from_cells(&headers, cells));
        }

        log::debug!(
            "Parsed roster: {} columns, {} records",
            headers.len(),
            records.len()
        );
        Ok(Roster::new(headers, records))
    }

    /// Parse roster bytes, which must be UTF-8.
    pub fn parse_bytes(&self, data: &[u8]) -> Result<Roster> {
        let text = std::str::from_utf8(data)
            .map_err(|e| Error::MalformedInput(format!("roster is not valid UTF-8: {}", e)))?;
        self.parse(text)
    }

    fn parse_headers(&self, line: &str) -> Result<Vec<String>> {
        let headers = self.split(line);
        if headers.iter().all(|h| h.is_empty()) {
            return Err(Error::MalformedInput(
                "header line contains no columns".to_string(),
            ));
        }
        if let Some(pos) = headers.iter().position(|h| h.is_empty()) {
            return Err(Error::MalformedInput(format!(
                "header column {} is blank",
                pos + 1
            )));
        }
        let mut seen = HashSet::new();
        for h in &headers {
            if !seen.insert(h.as_str()) {
                return Err(Error::MalformedInput(format!(
                    "duplicate header column '{}'",
                    h
                )));
            }
        }
        Ok(headers)
    }

    fn split(&self, line: &str) -> Vec<String> {
        line.split(self.options.delimiter)
            .map(|cell| {
                let cell = cell.trim();
                if self.options.normalize_unicode {
                    cell.nfc().collect()
                } else {
                    cell.to_string()
                }
            })
            .collect()
    }
}
