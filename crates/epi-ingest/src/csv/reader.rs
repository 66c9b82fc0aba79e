//! CSV file reading with explicit encoding and missing-value handling.

use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{IngestError, Result};

use super::options::IngestOptions;
use super::table::CsvTable;

fn read_error(path: &Path, e: std::io::Error) -> IngestError {
    if e.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        }
    }
}

/// Check file size against a limit before loading.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| read_error(path, e))?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }
    Ok(())
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Reads a CSV file with a single header row into a [`CsvTable`].
///
/// The file is decoded with `options.encoding`; cells listed in
/// `options.na_values` become empty. Blank lines are skipped and short
/// rows are padded to the header width.
pub fn read_csv_table(path: &Path, options: &IngestOptions) -> Result<CsvTable> {
    check_file_size_with_limit(path, options.max_file_size)?;
    let bytes = std::fs::read(path).map_err(|e| read_error(path, e))?;
    let text = options
        .encoding
        .decode(&bytes)
        .ok_or_else(|| IngestError::InvalidEncoding {
            path: path.to_path_buf(),
            encoding: options.encoding.name(),
        })?;
    let table = parse_csv(&text, options, path)?;
    tracing::info!(
        path = %path.display(),
        encoding = options.encoding.name(),
        rows = table.height(),
        columns = table.width(),
        "loaded source table"
    );
    Ok(table)
}

/// Parses already-decoded CSV text (useful for tests and in-memory sources).
pub fn read_csv_str(text: &str, options: &IngestOptions) -> Result<CsvTable> {
    parse_csv(text, options, Path::new("<memory>"))
}

fn parse_csv(text: &str, options: &IngestOptions, path: &Path) -> Result<CsvTable> {
    let csv_error = |e: csv::Error| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(normalize_header)
        .collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    let mut rows = Vec::new();
    let mut na_cells = 0usize;
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        let mut row = Vec::with_capacity(headers.len());
        for idx in 0..headers.len() {
            let value = record.get(idx).unwrap_or("");
            if options.is_na(value) {
                na_cells += 1;
                row.push(String::new());
            } else {
                row.push(value.to_string());
            }
        }
        rows.push(row);
    }
    if na_cells > 0 {
        tracing::debug!(path = %path.display(), na_cells, "mapped sentinel cells to missing");
    }
    Ok(CsvTable { headers, rows })
}
