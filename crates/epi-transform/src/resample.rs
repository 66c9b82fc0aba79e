//! Nearest-neighbour resampling of gridded arrays onto observation points.

use std::collections::BTreeMap;
use std::time::Instant;

use epi_model::{CanonicalArray, CoordValue, CoordValues, Coordinate};
use tracing::{debug, info, info_span};

use crate::error::{Result, TransformError};

/// Dimension the resampled points are stacked along unless told otherwise.
pub const DEFAULT_INDEX: &str = "location";

const LONGITUDE: &str = "lon";

/// Coordinates of a set of observation points, one value per point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservedPoints {
    coords: BTreeMap<String, CoordValues>,
}

impl ObservedPoints {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, values: impl Into<CoordValues>) -> Self {
        self.coords.insert(name.into(), values.into());
        self
    }

    /// The one-dimensional coordinates of a validated array.
    pub fn from_array(array: &CanonicalArray) -> Result<Self> {
        array.validate()?;
        let coords = array
            .coords()
            .iter()
            .filter(|(_, coord)| !coord.is_scalar())
            .map(|(name, coord)| (name.clone(), coord.values().clone()))
            .collect();
        Ok(Self { coords })
    }

    pub fn get(&self, name: &str) -> Option<&CoordValues> {
        self.coords.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.coords.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.coords.keys().map(String::as_str)
    }
}

/// Longitudes wrapped into `[0, 360)`; other values pass through.
fn normalize(dim: &str, value: CoordValue) -> CoordValue {
    if dim != LONGITUDE {
        return value;
    }
    match value {
        CoordValue::Float(lon) => CoordValue::Float(lon.rem_euclid(360.0)),
        CoordValue::Int(lon) => CoordValue::Int(lon.rem_euclid(360)),
        other => other,
    }
}

/// Samples `gridded` at every observed point.
///
/// Dimensions of `gridded` that the observed points also carry are matched
/// by nearest label, all at once for each point. The samples are stacked
/// along a new leading `index` dimension labelled with the observed
/// `index` values.
pub fn interp_on_observations(
    gridded: &CanonicalArray,
    observed: &ObservedPoints,
    index: &str,
) -> Result<CanonicalArray> {
    let span = info_span!("interp_on_observations", index);
    let _guard = span.enter();
    let start = Instant::now();

    let shared: Vec<&str> = gridded
        .dims()
        .iter()
        .map(String::as_str)
        .filter(|dim| observed.contains(dim))
        .collect();
    if shared.is_empty() {
        return Err(TransformError::NoSharedDimensions);
    }
    let labels = observed
        .get(index)
        .ok_or_else(|| TransformError::MissingCoordinate(index.to_string()))?;

    let mut lengths: BTreeMap<String, usize> = BTreeMap::new();
    lengths.insert(index.to_string(), labels.len());
    let mut columns: Vec<(&str, &CoordValues)> = Vec::with_capacity(shared.len());
    for dim in &shared {
        if let Some(values) = observed.get(dim) {
            lengths.insert((*dim).to_string(), values.len());
            columns.push((*dim, values));
        }
    }
    let mut distinct = lengths.values().copied();
    let points = distinct.next().unwrap_or(0);
    if distinct.any(|len| len != points) {
        return Err(TransformError::MismatchedObservationLength { lengths });
    }
    debug!(points, shared = ?shared, "matching observation points");

    let mut samples = Vec::with_capacity(points);
    for point in 0..points {
        let selection: Vec<(String, CoordValue)> = columns
            .iter()
            .filter_map(|(dim, values)| {
                values
                    .get(point)
                    .map(|value| ((*dim).to_string(), normalize(dim, value)))
            })
            .collect();
        samples.push(gridded.select_nearest(&selection)?);
    }

    let mut resampled = CanonicalArray::concat(samples, index)?;
    resampled.assign_coord(index, Coordinate::along(index, labels.clone()))?;

    info!(
        points,
        dims = shared.len(),
        duration_ms = start.elapsed().as_millis(),
        "resampled grid onto observations"
    );
    Ok(resampled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_negative_longitudes() {
        assert_eq!(
            normalize("lon", CoordValue::Float(-10.0)),
            CoordValue::Float(350.0)
        );
        assert_eq!(normalize("lon", CoordValue::Int(370)), CoordValue::Int(10));
        assert_eq!(
            normalize("lat", CoordValue::Float(-10.0)),
            CoordValue::Float(-10.0)
        );
    }
}
