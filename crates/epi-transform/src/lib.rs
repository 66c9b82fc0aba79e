//! Normalization of epidemiological source tables.
//!
//! Each source schema has its own entry point:
//!
//! - [`wide::reformat`]: wide time-series table to one row per place and day
//! - [`jhu::jhu_global_to_array`] / [`jhu::jhu_usa_to_array`]: JHU tables to
//!   `(location, time)` canonical arrays
//! - [`istat::istat_to_array`]: mortality registry to a
//!   `(year, time, age_class, location)` array
//!
//! [`resample::interp_on_observations`] samples a gridded array at a set of
//! observation points.

#![deny(unsafe_code)]

pub mod dates;
pub mod error;
mod frame;
pub mod istat;
pub mod jhu;
pub mod resample;
pub mod wide;

pub use error::{Result, TransformError};
pub use istat::{RegistryOptions, istat_to_array, istat_to_array_path};
pub use jhu::{
    jhu_global_to_array, jhu_global_to_array_path, jhu_usa_to_array, jhu_usa_to_array_path,
};
pub use resample::{DEFAULT_INDEX, ObservedPoints, interp_on_observations};
pub use wide::{reformat, reformat_path};
