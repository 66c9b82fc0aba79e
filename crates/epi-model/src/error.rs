use std::collections::BTreeSet;

use thiserror::Error;

/// Errors raised by canonical array construction, manipulation and checks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    // === CDM vocabulary ===
    /// Dimension names outside the CDM dimension vocabulary.
    #[error("unsupported dimensions: {}", fmt_names(names))]
    InvalidDimensions { names: BTreeSet<String> },

    /// Coordinate names outside the CDM coordinate vocabulary.
    #[error("unsupported coordinates: {}", fmt_names(names))]
    InvalidCoordinates { names: BTreeSet<String> },

    // === Structure ===
    #[error("array has {ndim} axes but {names} dimension names")]
    RankMismatch { ndim: usize, names: usize },

    #[error("duplicate dimension '{0}'")]
    DuplicateDimension(String),

    #[error("unknown dimension '{0}'")]
    UnknownDimension(String),

    #[error("unknown coordinate '{0}'")]
    UnknownCoordinate(String),

    #[error("coordinate '{name}' has {actual} values but dimension '{dim}' has length {expected}")]
    CoordinateLength {
        name: String,
        dim: String,
        expected: usize,
        actual: usize,
    },

    #[error("scalar coordinate '{name}' must hold exactly one value, got {actual}")]
    ScalarLength { name: String, actual: usize },

    #[error("coordinate '{name}' does not run along dimension '{dim}'")]
    NotAlongDimension { name: String, dim: String },

    #[error("invalid shape: {0}")]
    Shape(String),

    // === Selection ===
    #[error("dimension '{0}' has no coordinate to select on")]
    MissingDimensionCoordinate(String),

    #[error("no value of '{dim}' matches {target}")]
    NoMatch { dim: String, target: String },

    // === Concatenation ===
    #[error("cannot concatenate an empty list of arrays")]
    EmptyConcat,

    #[error("array {index} does not match the dimensions or shape of the first array")]
    ShapeMismatch { index: usize },

    #[error("coordinate '{0}' mixes value kinds across arrays")]
    MixedCoordinateKinds(String),
}

impl From<ndarray::ShapeError> for ModelError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::Shape(err.to_string())
    }
}

fn fmt_names(names: &BTreeSet<String>) -> String {
    let joined: Vec<&str> = names.iter().map(String::as_str).collect();
    format!("{{{}}}", joined.join(", "))
}

pub type Result<T> = std::result::Result<T, ModelError>;
