//! Options controlling how a source file is decoded and cleaned.

use std::borrow::Cow;

/// Maximum file size for CSV loading (500 MB default).
pub const MAX_CSV_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Text encoding of a source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceEncoding {
    /// UTF-8, with an optional byte order mark.
    #[default]
    Utf8,
    /// ISO-8859-1 / Latin-1, as published by the Italian statistics office.
    Latin1,
}

impl SourceEncoding {
    pub fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Latin1 => "ISO-8859-1",
        }
    }

    /// Decodes `bytes`; `None` when they are not valid in this encoding.
    pub(crate) fn decode(self, bytes: &[u8]) -> Option<Cow<'_, str>> {
        match self {
            Self::Utf8 => {
                let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
                if had_errors { None } else { Some(text) }
            }
            // Every byte maps to the code point of the same value.
            Self::Latin1 => Some(encoding_rs::mem::decode_latin1(bytes)),
        }
    }
}

/// How to load a source table.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub encoding: SourceEncoding,
    /// Cell values (compared after trimming) that mean "missing".
    pub na_values: Vec<String>,
    pub max_file_size: u64,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            encoding: SourceEncoding::Utf8,
            na_values: Vec::new(),
            max_file_size: MAX_CSV_FILE_SIZE,
        }
    }
}

impl IngestOptions {
    #[must_use]
    pub fn with_encoding(mut self, encoding: SourceEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_na_value(mut self, value: impl Into<String>) -> Self {
        self.na_values.push(value.into());
        self
    }

    #[must_use]
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    pub(crate) fn is_na(&self, cell: &str) -> bool {
        let trimmed = cell.trim();
        self.na_values.iter().any(|value| value == trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_latin1_accents() {
        let bytes = b"Forl\xec";
        let text = SourceEncoding::Latin1.decode(bytes).unwrap();
        assert_eq!(text, "Forlì");
        assert!(SourceEncoding::Utf8.decode(bytes).is_none());
    }

    #[test]
    fn latin1_keeps_c1_control_bytes() {
        let text = SourceEncoding::Latin1.decode(b"x\x80y\x9f").unwrap();
        assert_eq!(text, "x\u{80}y\u{9f}");
    }

    #[test]
    fn na_values_compare_trimmed() {
        let options = IngestOptions::default().with_na_value("9999");
        assert!(options.is_na(" 9999 "));
        assert!(!options.is_na("99990"));
    }
}
