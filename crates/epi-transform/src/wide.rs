//! Aggregation of wide time-series tables into one row per place and day.

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use chrono::NaiveDate;
use epi_common::parse_f64;
use epi_ingest::{CsvTable, IngestOptions, read_csv_table};
use epi_standards::{SchemaRegistry, TimeSeriesLayout};
use polars::prelude::*;
use tracing::{info, info_span};

use crate::dates::parse_wide_date;
use crate::error::Result;
use crate::frame::{date_column, require_column};

/// Optional per-row population column.
pub const POPULATION_COLUMN: &str = "Population";

/// Separator between country and state in wide-table locations.
pub const LOCATION_SEPARATOR: &str = " - ";

struct Line {
    location: String,
    country: String,
    date: NaiveDate,
    deaths: f64,
    population: f64,
}

/// Location label of a row: the trimmed country, plus the trimmed state
/// when there is one.
pub fn wide_location(country: &str, state: Option<&str>) -> String {
    let mut location = country.trim().to_string();
    if let Some(state) = state.map(str::trim).filter(|state| !state.is_empty()) {
        location.push_str(LOCATION_SEPARATOR);
        location.push_str(state);
    }
    location
}

/// Folds every date column of `table` into `(location, date)` rows.
///
/// Rows sharing a location accumulate their counts and populations. The
/// result has columns `date`, `location`, `country`, `deaths` and
/// `population`, in order of first appearance.
pub fn reformat(table: &CsvTable, layout: &TimeSeriesLayout) -> Result<DataFrame> {
    let span = info_span!("reformat", date_start = layout.date_start);
    let _guard = span.enter();
    let start = Instant::now();

    let country_idx = require_column(table, &layout.country)?;
    let state_idx = table.column_index(&layout.state);
    let population_idx = table.column_index(POPULATION_COLUMN);

    let date_columns: Vec<(usize, NaiveDate)> = table
        .headers
        .iter()
        .enumerate()
        .skip(layout.date_start)
        .map(|(idx, header)| parse_wide_date(header).map(|date| (idx, date)))
        .collect::<Result<_>>()?;

    let mut lines: Vec<Line> = Vec::new();
    let mut positions: HashMap<(String, NaiveDate), usize> = HashMap::new();
    for row in 0..table.height() {
        let country = table.cell(row, country_idx);
        let state = state_idx.map(|idx| table.cell(row, idx));
        let location = wide_location(country, state);
        let population = population_idx
            .and_then(|idx| parse_f64(table.cell(row, idx)))
            .unwrap_or(0.0);

        for &(idx, date) in &date_columns {
            let deaths = parse_f64(table.cell(row, idx)).unwrap_or(f64::NAN);
            let key = (location.clone(), date);
            let position = *positions.entry(key).or_insert_with(|| {
                lines.push(Line {
                    location: location.clone(),
                    country: country.to_string(),
                    date,
                    deaths: 0.0,
                    population: 0.0,
                });
                lines.len() - 1
            });
            let line = &mut lines[position];
            line.deaths += deaths;
            line.population += population;
        }
    }

    let dates: Vec<NaiveDate> = lines.iter().map(|line| line.date).collect();
    let columns = vec![
        date_column("date", &dates)?,
        Column::new(
            "location".into(),
            lines.iter().map(|line| line.location.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "country".into(),
            lines.iter().map(|line| line.country.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "deaths".into(),
            lines.iter().map(|line| line.deaths).collect::<Vec<_>>(),
        ),
        Column::new(
            "population".into(),
            lines.iter().map(|line| line.population).collect::<Vec<_>>(),
        ),
    ];
    let frame = DataFrame::new(columns)?;

    info!(
        source_rows = table.height(),
        dates = date_columns.len(),
        rows = frame.height(),
        duration_ms = start.elapsed().as_millis(),
        "wide table reformatted"
    );
    Ok(frame)
}

/// Reads the file at `path` and reformats it with the layout registered
/// for `kind`.
pub fn reformat_path(path: &Path, kind: &str, registry: &SchemaRegistry) -> Result<DataFrame> {
    let layout = registry.layout(kind)?;
    let table = read_csv_table(path, &IngestOptions::default())?;
    reformat(&table, layout)
}
