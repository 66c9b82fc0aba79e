//! Named-axis numeric array with labelled coordinates.

use std::collections::{BTreeMap, BTreeSet};

use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn};

use crate::cdm::cdm_check;
use crate::coord::{CoordValue, CoordValues, Coordinate};
use crate::error::{ModelError, Result};

/// A multi-dimensional `f64` array whose axes carry names and labels.
///
/// Coordinates are either scalar or run along exactly one dimension, and
/// their length always matches that dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalArray {
    name: Option<String>,
    dims: Vec<String>,
    data: ArrayD<f64>,
    coords: BTreeMap<String, Coordinate>,
}

impl CanonicalArray {
    /// Wraps `data`, naming its axes in order.
    pub fn new<S: Into<String>>(dims: Vec<S>, data: ArrayD<f64>) -> Result<Self> {
        let dims: Vec<String> = dims.into_iter().map(Into::into).collect();
        if dims.len() != data.ndim() {
            return Err(ModelError::RankMismatch {
                ndim: data.ndim(),
                names: dims.len(),
            });
        }
        let mut seen = BTreeSet::new();
        for dim in &dims {
            if !seen.insert(dim.as_str()) {
                return Err(ModelError::DuplicateDimension(dim.clone()));
            }
        }
        Ok(Self {
            name: None,
            dims,
            data,
            coords: BTreeMap::new(),
        })
    }

    /// Builds the array from row-major `values`.
    pub fn from_shape_vec<S: Into<String>>(
        dims: Vec<S>,
        shape: &[usize],
        values: Vec<f64>,
    ) -> Result<Self> {
        let data = ArrayD::from_shape_vec(IxDyn(shape), values)?;
        Self::new(dims, data)
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn axis_of(&self, dim: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == dim)
    }

    pub fn len_of(&self, dim: &str) -> Result<usize> {
        self.axis_of(dim)
            .map(|axis| self.data.len_of(Axis(axis)))
            .ok_or_else(|| ModelError::UnknownDimension(dim.to_string()))
    }

    pub fn coords(&self) -> &BTreeMap<String, Coordinate> {
        &self.coords
    }

    pub fn coord(&self, name: &str) -> Option<&Coordinate> {
        self.coords.get(name)
    }

    pub fn coord_names(&self) -> impl Iterator<Item = &str> {
        self.coords.keys().map(String::as_str)
    }

    /// Attaches (or replaces) a coordinate after checking it fits.
    pub fn assign_coord(&mut self, name: impl Into<String>, coord: Coordinate) -> Result<()> {
        let name = name.into();
        match coord.dim() {
            Some(dim) => {
                let expected = self.len_of(dim)?;
                let actual = coord.values().len();
                if expected != actual {
                    return Err(ModelError::CoordinateLength {
                        name,
                        dim: dim.to_string(),
                        expected,
                        actual,
                    });
                }
            }
            None => {
                let actual = coord.values().len();
                if actual != 1 {
                    return Err(ModelError::ScalarLength { name, actual });
                }
            }
        }
        self.coords.insert(name, coord);
        Ok(())
    }

    /// Builder-style [`assign_coord`](Self::assign_coord).
    pub fn with_coord(mut self, name: impl Into<String>, coord: Coordinate) -> Result<Self> {
        self.assign_coord(name, coord)?;
        Ok(self)
    }

    /// Replaces dimension `old` by `new`, where `new` is a coordinate along `old`.
    ///
    /// Every coordinate that ran along `old` runs along `new` afterwards.
    pub fn swap_dims(mut self, old: &str, new: &str) -> Result<Self> {
        let axis = self
            .axis_of(old)
            .ok_or_else(|| ModelError::UnknownDimension(old.to_string()))?;
        let coord = self
            .coords
            .get(new)
            .ok_or_else(|| ModelError::UnknownCoordinate(new.to_string()))?;
        if coord.dim() != Some(old) {
            return Err(ModelError::NotAlongDimension {
                name: new.to_string(),
                dim: old.to_string(),
            });
        }
        if self.axis_of(new).is_some() {
            return Err(ModelError::DuplicateDimension(new.to_string()));
        }
        self.dims[axis] = new.to_string();
        for coord in self.coords.values_mut() {
            if coord.dim() == Some(old) {
                coord.set_dim(Some(new.to_string()));
            }
        }
        Ok(self)
    }

    /// Removes the named coordinates; every name must exist.
    pub fn drop_vars(mut self, names: &[&str]) -> Result<Self> {
        for name in names {
            if self.coords.remove(*name).is_none() {
                return Err(ModelError::UnknownCoordinate((*name).to_string()));
            }
        }
        Ok(self)
    }

    /// Selects, along every listed dimension at once, the entry whose label is
    /// nearest to the requested value.
    ///
    /// Selected dimensions disappear from the result; their coordinates (and
    /// any other coordinate along them) become scalar coordinates holding the
    /// matched labels.
    pub fn select_nearest(&self, selection: &[(String, CoordValue)]) -> Result<Self> {
        let mut picks: Vec<(usize, usize)> = Vec::with_capacity(selection.len());
        let mut selected: BTreeMap<&str, usize> = BTreeMap::new();
        for (dim, target) in selection {
            let axis = self
                .axis_of(dim)
                .ok_or_else(|| ModelError::UnknownDimension(dim.clone()))?;
            let labels = self
                .coords
                .get(dim)
                .filter(|coord| coord.dim() == Some(dim.as_str()))
                .ok_or_else(|| ModelError::MissingDimensionCoordinate(dim.clone()))?;
            let index = labels
                .values()
                .nearest_index(target)
                .ok_or_else(|| ModelError::NoMatch {
                    dim: dim.clone(),
                    target: target.to_string(),
                })?;
            if selected.insert(dim.as_str(), index).is_some() {
                return Err(ModelError::DuplicateDimension(dim.clone()));
            }
            picks.push((axis, index));
        }

        // Highest axis first so the remaining axis numbers stay valid.
        picks.sort_by(|a, b| b.0.cmp(&a.0));
        let mut data = self.data.clone();
        for (axis, index) in &picks {
            let reduced = data.index_axis(Axis(*axis), *index).to_owned();
            data = reduced;
        }

        let dims = self
            .dims
            .iter()
            .filter(|dim| !selected.contains_key(dim.as_str()))
            .cloned()
            .collect();

        let mut coords = BTreeMap::new();
        for (name, coord) in &self.coords {
            let picked = coord.dim().and_then(|dim| selected.get(dim));
            let coord = match picked {
                Some(index) => match coord.values().get(*index) {
                    Some(value) => Coordinate::scalar(value),
                    None => continue,
                },
                None => coord.clone(),
            };
            coords.insert(name.clone(), coord);
        }

        tracing::trace!(
            dims = ?selection.iter().map(|(d, _)| d.as_str()).collect::<Vec<_>>(),
            "nearest selection"
        );
        Ok(Self {
            name: self.name.clone(),
            dims,
            data,
            coords,
        })
    }

    /// Stacks equally shaped arrays along a new leading dimension `dim`.
    ///
    /// Scalar coordinates become coordinates along `dim`; the others are
    /// taken from the first array.
    pub fn concat(arrays: Vec<Self>, dim: &str) -> Result<Self> {
        let Some(first) = arrays.first() else {
            return Err(ModelError::EmptyConcat);
        };
        if first.axis_of(dim).is_some() {
            return Err(ModelError::DuplicateDimension(dim.to_string()));
        }
        for (index, array) in arrays.iter().enumerate().skip(1) {
            if array.dims != first.dims || array.shape() != first.shape() {
                return Err(ModelError::ShapeMismatch { index });
            }
        }

        let views: Vec<ArrayViewD<'_, f64>> = arrays.iter().map(|a| a.data.view()).collect();
        let data = ndarray::stack(Axis(0), &views)?;

        let mut dims = Vec::with_capacity(first.dims.len() + 1);
        dims.push(dim.to_string());
        dims.extend(first.dims.iter().cloned());

        let mut coords = BTreeMap::new();
        for (name, coord) in &first.coords {
            if !coord.is_scalar() {
                coords.insert(name.clone(), coord.clone());
                continue;
            }
            let mut values = Vec::with_capacity(arrays.len());
            for array in &arrays {
                let value = array
                    .coords
                    .get(name)
                    .and_then(Coordinate::scalar_value)
                    .ok_or_else(|| ModelError::MixedCoordinateKinds(name.clone()))?;
                values.push(value);
            }
            let stacked = CoordValues::from_values(name, values)?;
            coords.insert(name.clone(), Coordinate::along(dim, stacked));
        }

        Ok(Self {
            name: first.name.clone(),
            dims,
            data,
            coords,
        })
    }

    /// Checks the array against the CDM vocabulary.
    pub fn validate(&self) -> Result<()> {
        cdm_check(self)
    }
}
