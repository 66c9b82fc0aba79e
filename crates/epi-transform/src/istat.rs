//! Normalizer for the ISTAT daily municipal mortality registry.
//!
//! Each registry row counts deaths for one municipality, calendar day and
//! age bracket, with one `TOTALE_YY` column per year. Days are stored as a
//! numeric `GE` code and age brackets as a numeric `CL_ETA` code.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::Instant;

use chrono::{NaiveDate, TimeDelta};
use epi_common::{parse_f64, parse_i64};
use epi_ingest::{CsvTable, IngestOptions, SourceEncoding, read_csv_table};
use epi_model::{CanonicalArray, Coordinate};
use ndarray::{ArrayD, IxDyn};
use polars::prelude::*;
use tracing::{debug, info, info_span, warn};

use crate::error::{Result, TransformError};
use crate::frame::{date_column, require_column, table_to_columns};

pub const GE: &str = "GE";
pub const CL_ETA: &str = "CL_ETA";
pub const NOME_COMUNE: &str = "NOME_COMUNE";
pub const NOME_REGIONE: &str = "NOME_REGIONE";
pub const NOME_PROVINCIA: &str = "NOME_PROVINCIA";
const TOTAL_PREFIX: &str = "TOTALE_";

/// Sentinel the registry writes for "not available".
pub const MISSING_SENTINEL: &str = "9999";

/// Every label [`age_class_label`] can produce, in sorted order.
pub const AGE_CLASSES: [&str; 6] = ["0-49", "50-59", "60-69", "70-79", "80-89", "90+"];

/// How registry rows are filtered and which years are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryOptions {
    /// Drop rows whose current-year total is missing.
    pub drop_missing: bool,
    /// Year of the most recent total column, also the calendar year of `time`.
    pub current_year: i32,
    /// Number of earlier years read next to the current one.
    pub history_years: i32,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            drop_missing: true,
            current_year: 2020,
            history_years: 5,
        }
    }
}

impl RegistryOptions {
    #[must_use]
    pub fn with_drop_missing(mut self, drop_missing: bool) -> Self {
        self.drop_missing = drop_missing;
        self
    }

    #[must_use]
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    /// Years read, oldest first.
    pub fn years(&self) -> Vec<i32> {
        (self.current_year - self.history_years..=self.current_year).collect()
    }

    /// Source column holding the totals of `year`, e.g. `TOTALE_20`.
    pub fn total_column(year: i32) -> String {
        format!("{TOTAL_PREFIX}{:02}", year.rem_euclid(100))
    }
}

/// Load options for registry files: Latin-1 with `9999` as missing.
pub fn ingest_options() -> IngestOptions {
    IngestOptions::default()
        .with_encoding(SourceEncoding::Latin1)
        .with_na_value(MISSING_SENTINEL)
}

/// Zero-based day of year encoded by a `GE` code.
///
/// The thresholds are those of the published registry and are applied as
/// they are, including for codes that name no real calendar day.
pub fn ge_to_dayofyear(code: i64) -> i64 {
    if code < 132 {
        code - 101
    } else if code < 230 {
        code - 170
    } else if code < 400 {
        code - 241
    } else {
        code - 310
    }
}

/// Calendar date `dayofyear` days after January 1st of `year`.
pub fn dayofyear_to_date(dayofyear: i64, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)?.checked_add_signed(TimeDelta::try_days(dayofyear)?)
}

/// Age bracket label of a `CL_ETA` code.
///
/// ```
/// use epi_transform::istat::age_class_label;
///
/// assert_eq!(age_class_label(10), "0-49");
/// assert_eq!(age_class_label(11), "50-59");
/// assert_eq!(age_class_label(19), "90+");
/// ```
pub fn age_class_label(code: i64) -> String {
    if code <= 10 {
        "0-49".to_string()
    } else if code < 19 {
        let low = (code - 1) / 2 * 10;
        format!("{low}-{}", low + 9)
    } else {
        "90+".to_string()
    }
}

/// One retained registry row.
#[derive(Debug, Clone, PartialEq)]
pub struct MortalityRecord {
    /// Row number in the source table.
    pub row: usize,
    pub time: NaiveDate,
    pub age_class: String,
    pub municipality: String,
    pub region: String,
    pub province: String,
    /// Totals per year of [`RegistryOptions::years`]; `NaN` when missing.
    pub totals: Vec<f64>,
}

struct Columns {
    ge: usize,
    cl_eta: usize,
    municipality: usize,
    region: usize,
    province: usize,
    totals: Vec<usize>,
}

impl Columns {
    fn locate(table: &CsvTable, options: &RegistryOptions) -> Result<Self> {
        let require = |name: &str| require_column(table, name);
        let totals = options
            .years()
            .into_iter()
            .map(|year| require(RegistryOptions::total_column(year).as_str()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            ge: require(GE)?,
            cl_eta: require(CL_ETA)?,
            municipality: require(NOME_COMUNE)?,
            region: require(NOME_REGIONE)?,
            province: require(NOME_PROVINCIA)?,
            totals,
        })
    }
}

fn code(table: &CsvTable, row: usize, column: usize, field: &'static str) -> Result<i64> {
    let cell = table.cell(row, column);
    parse_i64(cell).ok_or_else(|| TransformError::InvalidCode {
        field,
        value: cell.to_string(),
        row,
    })
}

/// Decodes the rows of `table`, dropping those without a current-year
/// total when [`RegistryOptions::drop_missing`] is set.
pub fn istat_to_records(
    table: &CsvTable,
    options: &RegistryOptions,
) -> Result<Vec<MortalityRecord>> {
    let columns = Columns::locate(table, options)?;
    let mut records = Vec::with_capacity(table.height());
    let mut dropped = 0usize;

    for row in 0..table.height() {
        let totals: Vec<f64> = columns
            .totals
            .iter()
            .map(|&idx| parse_f64(table.cell(row, idx)).unwrap_or(f64::NAN))
            .collect();
        let current = totals.last().copied().unwrap_or(f64::NAN);
        if options.drop_missing && !current.is_finite() {
            dropped += 1;
            continue;
        }

        let ge = code(table, row, columns.ge, GE)?;
        let time = dayofyear_to_date(ge_to_dayofyear(ge), options.current_year).ok_or_else(|| {
            TransformError::InvalidCode {
                field: GE,
                value: ge.to_string(),
                row,
            }
        })?;
        let age_class = age_class_label(code(table, row, columns.cl_eta, CL_ETA)?);

        records.push(MortalityRecord {
            row,
            time,
            age_class,
            municipality: table.cell(row, columns.municipality).trim().to_string(),
            region: table.cell(row, columns.region).trim().to_string(),
            province: table.cell(row, columns.province).trim().to_string(),
            totals,
        });
    }

    if dropped > 0 {
        warn!(dropped, kept = records.len(), "dropped rows without current-year total");
    }
    Ok(records)
}

/// Source columns of the retained rows plus the derived `time` and
/// `age_class` columns.
pub fn records_to_frame(table: &CsvTable, records: &[MortalityRecord]) -> Result<DataFrame> {
    let rows: Vec<usize> = records.iter().map(|record| record.row).collect();
    let dates: Vec<NaiveDate> = records.iter().map(|record| record.time).collect();
    let mut columns = table_to_columns(table, &rows);
    columns.push(date_column("time", &dates)?);
    columns.push(Column::new(
        "age_class".into(),
        records
            .iter()
            .map(|record| record.age_class.as_str())
            .collect::<Vec<_>>(),
    ));
    Ok(DataFrame::new(columns)?)
}

fn positions<T: Ord + Clone>(keys: &BTreeSet<T>) -> BTreeMap<T, usize> {
    keys.iter().cloned().enumerate().map(|(i, key)| (key, i)).collect()
}

/// Sums the records into a dense `(year, time, age_class, location)` array.
///
/// Keys along each axis are sorted. Combinations with no record, and
/// missing totals, count as zero.
pub fn records_to_array(
    records: &[MortalityRecord],
    options: &RegistryOptions,
) -> Result<CanonicalArray> {
    let years = options.years();
    let times: BTreeSet<NaiveDate> = records.iter().map(|r| r.time).collect();
    let ages: BTreeSet<String> = records.iter().map(|r| r.age_class.clone()).collect();
    let locations: BTreeSet<String> = records.iter().map(|r| r.municipality.clone()).collect();

    let time_pos = positions(&times);
    let age_pos = positions(&ages);
    let location_pos = positions(&locations);

    let shape = [years.len(), times.len(), ages.len(), locations.len()];
    let mut data = ArrayD::<f64>::zeros(IxDyn(&shape));
    let mut regions: BTreeMap<&str, &str> = BTreeMap::new();
    let mut provinces: BTreeMap<&str, &str> = BTreeMap::new();
    for record in records {
        let (Some(&t), Some(&a), Some(&l)) = (
            time_pos.get(&record.time),
            age_pos.get(&record.age_class),
            location_pos.get(&record.municipality),
        ) else {
            continue;
        };
        for (y, total) in record.totals.iter().enumerate() {
            if total.is_finite() {
                data[[y, t, a, l].as_slice()] += *total;
            }
        }
        regions
            .entry(record.municipality.as_str())
            .or_insert(record.region.as_str());
        provinces
            .entry(record.municipality.as_str())
            .or_insert(record.province.as_str());
    }

    let per_location = |first: &BTreeMap<&str, &str>| -> Vec<String> {
        locations
            .iter()
            .map(|name| first.get(name.as_str()).copied().unwrap_or_default().to_string())
            .collect()
    };

    let array = CanonicalArray::new(vec!["year", "time", "age_class", "location"], data)?
        .with_name("deaths")
        .with_coord(
            "year",
            Coordinate::along("year", years.iter().map(|&y| i64::from(y)).collect::<Vec<_>>()),
        )?
        .with_coord("time", Coordinate::along("time", times.into_iter().collect::<Vec<_>>()))?
        .with_coord(
            "age_class",
            Coordinate::along("age_class", ages.into_iter().collect::<Vec<_>>()),
        )?
        .with_coord("region", Coordinate::along("location", per_location(&regions)))?
        .with_coord("province", Coordinate::along("location", per_location(&provinces)))?
        .with_coord(
            "location",
            Coordinate::along("location", locations.iter().cloned().collect::<Vec<_>>()),
        )?;
    array.validate()?;
    Ok(array)
}

/// Normalizes a registry table into its retained rows and the summed
/// canonical array.
pub fn istat_to_array(
    table: &CsvTable,
    options: &RegistryOptions,
) -> Result<(DataFrame, CanonicalArray)> {
    let span = info_span!("istat", current_year = options.current_year);
    let _guard = span.enter();
    let start = Instant::now();

    let records = istat_to_records(table, options)?;
    debug!(records = records.len(), "decoded registry rows");
    let frame = records_to_frame(table, &records)?;
    let array = records_to_array(&records, options)?;

    info!(
        rows = frame.height(),
        shape = ?array.shape(),
        duration_ms = start.elapsed().as_millis(),
        "mortality registry normalized"
    );
    Ok((frame, array))
}

/// Reads a registry file (Latin-1, `9999` missing) and normalizes it.
pub fn istat_to_array_path(
    path: &Path,
    options: &RegistryOptions,
) -> Result<(DataFrame, CanonicalArray)> {
    let table = read_csv_table(path, &ingest_options())?;
    istat_to_array(&table, options)
}
