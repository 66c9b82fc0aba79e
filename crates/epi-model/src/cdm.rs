//! Common data model (CDM) vocabulary.
//!
//! Every array handed to downstream consumers may only use these
//! dimension and coordinate names.

use std::collections::BTreeSet;

use crate::array::CanonicalArray;
use crate::error::{ModelError, Result};

/// Dimensions an array may be indexed by.
pub const CDM_DIMS: &[&str] = &["location", "time", "age_class", "dayofyear", "month", "year"];

/// Labels an array may carry; a superset of [`CDM_DIMS`].
pub const CDM_COORDS: &[&str] = &[
    "location",
    "time",
    "age_class",
    "dayofyear",
    "month",
    "year",
    "country",
    "state",
    "region",
    "province",
    "lat",
    "lon",
];

pub fn is_cdm_dim(name: &str) -> bool {
    CDM_DIMS.contains(&name)
}

pub fn is_cdm_coord(name: &str) -> bool {
    CDM_COORDS.contains(&name)
}

/// Rejects arrays with dimensions or coordinates outside the vocabulary.
///
/// Dimensions are checked first; each error carries every offending name.
pub fn cdm_check(array: &CanonicalArray) -> Result<()> {
    let dims: BTreeSet<String> = array
        .dims()
        .iter()
        .filter(|name| !is_cdm_dim(name))
        .cloned()
        .collect();
    if !dims.is_empty() {
        return Err(ModelError::InvalidDimensions { names: dims });
    }

    let coords: BTreeSet<String> = array
        .coord_names()
        .filter(|name| !is_cdm_coord(name))
        .map(str::to_string)
        .collect();
    if !coords.is_empty() {
        return Err(ModelError::InvalidCoordinates { names: coords });
    }
    Ok(())
}
