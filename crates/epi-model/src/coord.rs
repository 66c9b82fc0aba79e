//! Coordinate labels attached to array dimensions.

use std::fmt;

use chrono::NaiveDate;

use crate::error::{ModelError, Result};

/// A single coordinate label.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordValue {
    Text(String),
    Float(f64),
    Int(i64),
    Date(NaiveDate),
}

impl CoordValue {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl fmt::Display for CoordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(v) => write!(f, "'{v}'"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for CoordValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CoordValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CoordValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for CoordValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<NaiveDate> for CoordValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

/// A typed, ordered run of coordinate labels.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordValues {
    Text(Vec<String>),
    Float(Vec<f64>),
    Int(Vec<i64>),
    Date(Vec<NaiveDate>),
}

impl CoordValues {
    pub fn len(&self) -> usize {
        match self {
            Self::Text(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Date(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<CoordValue> {
        match self {
            Self::Text(v) => v.get(index).cloned().map(CoordValue::Text),
            Self::Float(v) => v.get(index).copied().map(CoordValue::Float),
            Self::Int(v) => v.get(index).copied().map(CoordValue::Int),
            Self::Date(v) => v.get(index).copied().map(CoordValue::Date),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = CoordValue> + '_ {
        (0..self.len()).filter_map(|index| self.get(index))
    }

    /// Numeric labels as `f64`; `None` for text and date labels.
    pub fn as_f64(&self) -> Option<Vec<f64>> {
        match self {
            Self::Float(v) => Some(v.clone()),
            Self::Int(v) => Some(v.iter().map(|x| *x as f64).collect()),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&[String]> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Index of the label nearest to `target`.
    ///
    /// Numeric labels compare by absolute difference, dates by day distance,
    /// text labels only match exactly. Ties keep the first index; NaN
    /// labels never match.
    pub fn nearest_index(&self, target: &CoordValue) -> Option<usize> {
        match (self, target) {
            (Self::Text(values), CoordValue::Text(t)) => values.iter().position(|v| v == t),
            (Self::Date(values), CoordValue::Date(t)) => values
                .iter()
                .enumerate()
                .min_by_key(|(_, v)| (**v - *t).num_days().abs())
                .map(|(index, _)| index),
            (Self::Float(_) | Self::Int(_), _) => {
                let t = target.as_f64()?;
                let values = self.as_f64()?;
                let mut best: Option<(usize, f64)> = None;
                for (index, value) in values.iter().enumerate() {
                    let distance = (value - t).abs();
                    if distance.is_nan() {
                        continue;
                    }
                    match best {
                        Some((_, current)) if current <= distance => {}
                        _ => best = Some((index, distance)),
                    }
                }
                best.map(|(index, _)| index)
            }
            _ => None,
        }
    }

    /// Builds a run from individual labels; all labels must share one kind.
    pub fn from_values(name: &str, values: Vec<CoordValue>) -> Result<Self> {
        let mixed = || ModelError::MixedCoordinateKinds(name.to_string());
        let Some(first) = values.first().cloned() else {
            return Ok(Self::Float(Vec::new()));
        };
        match first {
            CoordValue::Text(_) => values
                .into_iter()
                .map(|v| match v {
                    CoordValue::Text(s) => Ok(s),
                    _ => Err(mixed()),
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::Text),
            CoordValue::Float(_) => values
                .into_iter()
                .map(|v| match v {
                    CoordValue::Float(x) => Ok(x),
                    _ => Err(mixed()),
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::Float),
            CoordValue::Int(_) => values
                .into_iter()
                .map(|v| match v {
                    CoordValue::Int(x) => Ok(x),
                    _ => Err(mixed()),
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::Int),
            CoordValue::Date(_) => values
                .into_iter()
                .map(|v| match v {
                    CoordValue::Date(d) => Ok(d),
                    _ => Err(mixed()),
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::Date),
        }
    }
}

impl From<Vec<String>> for CoordValues {
    fn from(values: Vec<String>) -> Self {
        Self::Text(values)
    }
}

impl From<Vec<&str>> for CoordValues {
    fn from(values: Vec<&str>) -> Self {
        Self::Text(values.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<f64>> for CoordValues {
    fn from(values: Vec<f64>) -> Self {
        Self::Float(values)
    }
}

impl From<Vec<i64>> for CoordValues {
    fn from(values: Vec<i64>) -> Self {
        Self::Int(values)
    }
}

impl From<Vec<NaiveDate>> for CoordValues {
    fn from(values: Vec<NaiveDate>) -> Self {
        Self::Date(values)
    }
}

/// Labels attached to an array: scalar, or one-dimensional along a dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    dim: Option<String>,
    values: CoordValues,
}

impl Coordinate {
    /// A coordinate running along `dim`.
    pub fn along(dim: impl Into<String>, values: impl Into<CoordValues>) -> Self {
        Self {
            dim: Some(dim.into()),
            values: values.into(),
        }
    }

    /// A coordinate attached to no dimension, holding one label.
    pub fn scalar(value: impl Into<CoordValue>) -> Self {
        let values = match value.into() {
            CoordValue::Text(v) => CoordValues::Text(vec![v]),
            CoordValue::Float(v) => CoordValues::Float(vec![v]),
            CoordValue::Int(v) => CoordValues::Int(vec![v]),
            CoordValue::Date(v) => CoordValues::Date(vec![v]),
        };
        Self { dim: None, values }
    }

    pub fn dim(&self) -> Option<&str> {
        self.dim.as_deref()
    }

    pub fn values(&self) -> &CoordValues {
        &self.values
    }

    pub fn is_scalar(&self) -> bool {
        self.dim.is_none()
    }

    /// The label of a scalar coordinate.
    pub fn scalar_value(&self) -> Option<CoordValue> {
        if self.is_scalar() {
            self.values.get(0)
        } else {
            None
        }
    }

    pub(crate) fn set_dim(&mut self, dim: Option<String>) {
        self.dim = dim;
    }
}
