//! Roster types: the tabular recipient data.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One roster row, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    values: HashMap<String, String>,
}

impl Record {
    /// Build a record from `headers` and positional `cells`.
    ///
    /// Missing trailing cells become empty strings; surplus cells are ignored.
    pub(crate) fn from_cells(headers: &[String], mut cells: Vec<String>) -> Self {
        cells.resize(headers.len(), String::new());
        let values = headers.iter().cloned().zip(cells).collect();
        Self { values }
    }

    /// Value for `column`, if the column exists.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Number of columns in the record.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the record has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(column, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A parsed roster.
///
/// Every record carries exactly the columns listed in `headers`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    headers: Vec<String>,
    records: Vec<Record>,
}

impl Roster {
    pub(crate) fn new(headers: Vec<String>, records: Vec<Record>) -> Self {
        Self { headers, records }
    }

    /// Column names in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// All records in file order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Record at `index` (0-indexed).
    pub fn record(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Check if `column` is one of the headers.
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the roster has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Guess which column holds e-mail addresses: a header named like
    /// "email"/"e-mail"/"mail", case-insensitive.
    pub fn email_column(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| {
                let lower = h.to_lowercase().replace(['-', '_', ' '], "");
                lower == "email" || lower == "mail" || lower == "emailaddress"
            })
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        vec!["Name".to_string(), "Email".to_string()]
    }

    #[test]
    fn test_record_pads_missing_cells() {
        let record = Record::from_cells(&headers(), vec!["Ada".to_string()]);
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("Name"), Some("Ada"));
        assert_eq!(record.get("Email"), Some(""));
        assert_eq!(record.get("Age"), None);
    }

    #[test]
    fn test_record_drops_extra_cells() {
        let cells = vec!["Ada".into(), "ada@x.com".into(), "extra".into()];
        let record = Record::from_cells(&headers(), cells);
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_email_column_detection() {
        let roster = Roster::new(vec!["Name".into(), "E-Mail".into()], Vec::new());
        assert_eq!(roster.email_column(), Some("E-Mail"));

        let roster = Roster::new(vec!["Name".into()], Vec::new());
        assert_eq!(roster.email_column(), None);
    }
}
