//! Source table ingestion.
//!
//! Loads the CSV files published by the supported repositories into a
//! [`CsvTable`] of text cells, ready for schema-specific normalization.
//!
//! # Features
//!
//! - **Encodings**: UTF-8 (time series) and Latin-1 (mortality registry)
//! - **Missing values**: configurable sentinel values (e.g. `9999`) become empty cells
//! - **Size guard**: files above a configurable limit are rejected before reading
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use epi_ingest::{IngestOptions, SourceEncoding, read_csv_table};
//!
//! let options = IngestOptions::default()
//!     .with_encoding(SourceEncoding::Latin1)
//!     .with_na_value("9999");
//! let table = read_csv_table(Path::new("comuni_giornaliero.csv"), &options)?;
//! ```

mod csv;
mod error;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{
    CsvTable, IngestOptions, MAX_CSV_FILE_SIZE, SourceEncoding, check_file_size_with_limit,
    read_csv_str, read_csv_table,
};
