//! Array builders for the JHU CSSE time-series tables.

use std::path::Path;
use std::time::Instant;

use chrono::NaiveDate;
use epi_common::{join_non_empty, parse_f64};
use epi_ingest::{CsvTable, IngestOptions, read_csv_table};
use epi_model::{CanonicalArray, Coordinate};
use tracing::{debug, info, info_span};

use crate::dates::parse_label_date;
use crate::error::Result;

/// Year given to every `M/D/YY` label of the JHU tables.
pub const DATASET_EPOCH_YEAR: i32 = 2020;

/// Separator between geography parts in array locations.
pub const LOCATION_SEPARATOR: &str = " / ";

const ROW_DIM: &str = "index";
const DATE_DIM: &str = "date";

/// How one JHU table maps onto a `(location, time)` array.
#[derive(Debug, Clone, Copy)]
pub struct ArrayLayout {
    /// Source column to coordinate name.
    pub renames: &'static [(&'static str, &'static str)],
    /// Text coordinates; everything else renamed is numeric.
    pub text_coords: &'static [&'static str],
    /// Metadata columns discarded when present.
    pub drops: &'static [&'static str],
    /// Coordinates joined, broad to narrow, into the location label.
    pub location_fields: &'static [&'static str],
    /// Coordinates removed once folded into the location.
    pub folded: &'static [&'static str],
}

impl ArrayLayout {
    pub const GLOBAL: Self = Self {
        renames: &[
            ("Country/Region", "country"),
            ("Province/State", "state"),
            ("Lat", "lat"),
            ("Long", "lon"),
        ],
        text_coords: &["country", "state"],
        drops: &[],
        location_fields: &["country", "state"],
        folded: &["state"],
    };

    pub const USA: Self = Self {
        renames: &[
            ("Country_Region", "country"),
            ("Province_State", "state"),
            ("Admin2", "county"),
            ("Lat", "lat"),
            ("Long_", "lon"),
            ("Population", "population"),
        ],
        text_coords: &["country", "state", "county"],
        drops: &["UID", "iso2", "iso3", "code3", "FIPS", "Combined_Key"],
        location_fields: &["country", "state", "county"],
        folded: &["county", "population"],
    };

    fn is_text(&self, coord: &str) -> bool {
        self.text_coords.contains(&coord)
    }
}

/// Converts a global JHU table into a `(location, time)` array.
pub fn jhu_global_to_array(table: &CsvTable) -> Result<CanonicalArray> {
    build_array(table, &ArrayLayout::GLOBAL, "global")
}

/// Converts a US JHU table into a `(location, time)` array.
pub fn jhu_usa_to_array(table: &CsvTable) -> Result<CanonicalArray> {
    build_array(table, &ArrayLayout::USA, "usa")
}

pub fn jhu_global_to_array_path(path: &Path) -> Result<CanonicalArray> {
    let table = read_csv_table(path, &IngestOptions::default())?;
    jhu_global_to_array(&table)
}

pub fn jhu_usa_to_array_path(path: &Path) -> Result<CanonicalArray> {
    let table = read_csv_table(path, &IngestOptions::default())?;
    jhu_usa_to_array(&table)
}

/// Builds the canonical array of `table` following `layout`.
pub fn build_array(table: &CsvTable, layout: &ArrayLayout, schema: &str) -> Result<CanonicalArray> {
    let span = info_span!("jhu_array", schema);
    let _guard = span.enter();
    let start = Instant::now();

    let mut geography: Vec<(&'static str, usize)> = Vec::new();
    let mut date_columns: Vec<usize> = Vec::new();
    for (idx, header) in table.headers.iter().enumerate() {
        if let Some(&(_, coord)) = layout
            .renames
            .iter()
            .find(|(source, _)| *source == header.as_str())
        {
            geography.push((coord, idx));
        } else if !layout.drops.contains(&header.as_str()) {
            date_columns.push(idx);
        }
    }
    debug!(
        geography = geography.len(),
        dates = date_columns.len(),
        "classified source columns"
    );

    let rows = table.height();
    let mut values = Vec::with_capacity(rows * date_columns.len());
    for row in 0..rows {
        for &idx in &date_columns {
            values.push(parse_f64(table.cell(row, idx)).unwrap_or(f64::NAN));
        }
    }
    let mut array = CanonicalArray::from_shape_vec(
        vec![ROW_DIM, DATE_DIM],
        &[rows, date_columns.len()],
        values,
    )?;

    array.assign_coord(
        ROW_DIM,
        Coordinate::along(ROW_DIM, (0..rows as i64).collect::<Vec<_>>()),
    )?;
    let labels: Vec<&str> = date_columns
        .iter()
        .map(|&idx| table.headers[idx].as_str())
        .collect();
    array.assign_coord(DATE_DIM, Coordinate::along(DATE_DIM, labels.clone()))?;

    for &(coord, idx) in &geography {
        let values = if layout.is_text(coord) {
            Coordinate::along(
                ROW_DIM,
                table.column(idx).map(str::trim).collect::<Vec<_>>(),
            )
        } else {
            Coordinate::along(
                ROW_DIM,
                table
                    .column(idx)
                    .map(|cell| parse_f64(cell).unwrap_or(f64::NAN))
                    .collect::<Vec<_>>(),
            )
        };
        array.assign_coord(coord, values)?;
    }

    let time: Vec<NaiveDate> = labels
        .iter()
        .map(|label| parse_label_date(label, DATASET_EPOCH_YEAR))
        .collect::<Result<_>>()?;
    let location = location_labels(table, layout, &geography);
    array.assign_coord("time", Coordinate::along(DATE_DIM, time))?;
    array.assign_coord("location", Coordinate::along(ROW_DIM, location))?;

    let array = array.swap_dims(DATE_DIM, "time")?.swap_dims(ROW_DIM, "location")?;
    let mut dropped: Vec<&str> = vec![ROW_DIM, DATE_DIM];
    dropped.extend(
        layout
            .folded
            .iter()
            .copied()
            .filter(|name| array.coord(name).is_some()),
    );
    let array = array.drop_vars(&dropped)?;
    array.validate()?;

    info!(
        locations = rows,
        dates = date_columns.len(),
        duration_ms = start.elapsed().as_millis(),
        "canonical array built"
    );
    Ok(array)
}

fn location_labels(
    table: &CsvTable,
    layout: &ArrayLayout,
    geography: &[(&'static str, usize)],
) -> Vec<String> {
    let fields: Vec<usize> = layout
        .location_fields
        .iter()
        .filter_map(|field| {
            geography
                .iter()
                .find(|(coord, _)| coord == field)
                .map(|&(_, idx)| idx)
        })
        .collect();
    (0..table.height())
        .map(|row| {
            join_non_empty(
                fields.iter().map(|&idx| table.cell(row, idx).trim()),
                LOCATION_SEPARATOR,
            )
        })
        .collect()
}
