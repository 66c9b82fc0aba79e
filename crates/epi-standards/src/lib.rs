#![deny(unsafe_code)]

pub mod error;
pub mod registry;

pub use crate::error::{Result, StandardsError};
pub use crate::registry::{
    Repository, SchemaRegistry, TimeSeriesLayout, URL_PLACEHOLDER, file_name,
};
