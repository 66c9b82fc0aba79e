//! Error types for source normalization and resampling.

use std::collections::BTreeMap;

use epi_ingest::IngestError;
use epi_model::ModelError;
use epi_standards::StandardsError;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Standards(#[from] StandardsError),

    #[error("DataFrame operation failed: {0}")]
    Polars(#[from] PolarsError),

    // === Source schema ===
    #[error("column '{column}' not found in source table")]
    MissingColumn { column: String },

    #[error("cannot parse date column label '{label}'")]
    InvalidDate { label: String },

    #[error("invalid {field} value '{value}' in row {row}")]
    InvalidCode {
        field: &'static str,
        value: String,
        row: usize,
    },

    // === Resampling ===
    #[error("observed coordinates differ in length: {}", fmt_lengths(lengths))]
    MismatchedObservationLength { lengths: BTreeMap<String, usize> },

    #[error("gridded array shares no dimension with the observed coordinates")]
    NoSharedDimensions,

    #[error("observed coordinates have no '{0}' entry")]
    MissingCoordinate(String),
}

fn fmt_lengths(lengths: &BTreeMap<String, usize>) -> String {
    lengths
        .iter()
        .map(|(name, len)| format!("{name}={len}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, TransformError>;
