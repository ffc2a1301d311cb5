//! Roster parsing options.

/// Options for parsing roster text.
#[derive(Debug, Clone)]
pub struct RosterOptions {
    /// Cell delimiter
    pub delimiter: char,

    /// Apply Unicode NFC normalization to cell values
    pub normalize_unicode: bool,

    /// Skip data lines that contain only whitespace
    pub skip_blank_lines: bool,
}

impl RosterOptions {
    /// Create new roster options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cell delimiter.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Use semicolons, as spreadsheet exports in many locales do.
    pub fn semicolon(mut self) -> Self {
        self.delimiter = ';';
        self
    }

    /// Enable or disable Unicode normalization.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Keep blank data lines as empty records.
    pub fn keep_blank_lines(mut self) -> Self {
        self.skip_blank_lines = false;
        self
    }
}

impl Default for RosterOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            normalize_unicode: true,
            skip_blank_lines: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_options_builder() {
        let options = RosterOptions::new()
            .semicolon()
            .with_unicode_normalization(false)
            .keep_blank_lines();

        assert_eq!(options.delimiter, ';');
        assert!(!options.normalize_unicode);
        assert!(!options.skip_blank_lines);
    }

    #[test]
    fn test_default_options() {
        let options = RosterOptions::default();
        assert_eq!(options.delimiter, ',');
        assert!(options.normalize_unicode);
        assert!(options.skip_blank_lines);
    }
}
