//! Canonical data model for normalized epidemiological datasets.
//!
//! Source-specific tables are converted into [`CanonicalArray`]s: named-axis
//! numeric arrays whose dimensions and coordinates are restricted to the CDM
//! vocabulary in [`cdm`].

#![deny(unsafe_code)]

pub mod array;
pub mod cdm;
pub mod coord;
pub mod error;

pub use array::CanonicalArray;
pub use cdm::{CDM_COORDS, CDM_DIMS, cdm_check};
pub use coord::{CoordValue, CoordValues, Coordinate};
pub use error::{ModelError, Result};
