//! Helpers for building polars frames from raw tables.

use chrono::NaiveDate;
use epi_common::parse_f64;
use epi_ingest::CsvTable;
use polars::prelude::*;

use crate::dates::epoch_days;
use crate::error::{Result, TransformError};

/// Index of the `column` header, or [`TransformError::MissingColumn`].
pub(crate) fn require_column(table: &CsvTable, column: &str) -> Result<usize> {
    table
        .column_index(column)
        .ok_or_else(|| TransformError::MissingColumn {
            column: column.to_string(),
        })
}

/// A `Date` column holding `dates` in order.
pub(crate) fn date_column(name: &str, dates: &[NaiveDate]) -> Result<Column> {
    let days: Vec<i32> = dates.iter().copied().map(epoch_days).collect();
    let series = Series::new(name.into(), days).cast(&DataType::Date)?;
    Ok(series.into_column())
}

/// Converts the selected rows of `table` into a frame.
///
/// A column whose non-empty cells all parse as numbers becomes `Float64`,
/// any other column stays `String`; empty cells are null either way.
pub(crate) fn table_to_columns(table: &CsvTable, rows: &[usize]) -> Vec<Column> {
    let mut columns = Vec::with_capacity(table.width());
    for (idx, header) in table.headers.iter().enumerate() {
        let cells: Vec<&str> = rows.iter().map(|&row| table.cell(row, idx)).collect();
        let numeric = cells
            .iter()
            .filter(|cell| !cell.trim().is_empty())
            .all(|cell| parse_f64(cell).is_some());
        let column = if numeric {
            let values: Vec<Option<f64>> = cells.iter().map(|cell| parse_f64(cell)).collect();
            Column::new(header.as_str().into(), values)
        } else {
            let values: Vec<Option<&str>> = cells
                .iter()
                .map(|cell| if cell.is_empty() { None } else { Some(*cell) })
                .collect();
            Column::new(header.as_str().into(), values)
        };
        columns.push(column);
    }
    columns
}
