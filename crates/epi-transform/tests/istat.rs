use std::io::Write;

use chrono::NaiveDate;
use epi_ingest::{IngestOptions, read_csv_str};
use epi_model::{CanonicalArray, CoordValues};
use epi_transform::istat::{
    AGE_CLASSES, age_class_label, dayofyear_to_date, ge_to_dayofyear, istat_to_records,
};
use epi_transform::{RegistryOptions, TransformError, istat_to_array, istat_to_array_path};
use polars::prelude::*;
use proptest::prelude::*;
use tempfile::NamedTempFile;

const HEADER: &[u8] = b"REG,PROV,NOME_REGIONE,NOME_PROVINCIA,NOME_COMUNE,COD_PROVCOM,CL_ETA,GE,\
TOTALE_15,TOTALE_16,TOTALE_17,TOTALE_18,TOTALE_19,TOTALE_20\n";

fn registry_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(HEADER).unwrap();
    file.write_all(b"3,16,Lombardia,Bergamo,Bergamo,16024,11,101,1,1,1,1,1,2\n")
        .unwrap();
    file.write_all(b"3,16,Lombardia,Bergamo,Bergamo,16024,12,101,0,0,0,0,1,3\n")
        .unwrap();
    file.write_all(
        b"8,40,Emilia-Romagna,Forl\xec-Cesena,Forl\xec,40012,19,229,1,1,1,1,1,9999\n",
    )
    .unwrap();
    file.write_all(b"8,40,Emilia-Romagna,Forl\xec-Cesena,Forl\xec,40012,5,201,9999,1,1,1,1,1\n")
        .unwrap();
    file
}

fn ymd(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, m, d).unwrap()
}

fn at(array: &CanonicalArray, index: [usize; 4]) -> f64 {
    array.data()[index.as_slice()]
}

fn text(values: &CoordValues) -> Vec<&str> {
    values.as_text().unwrap().iter().map(String::as_str).collect()
}

#[test]
fn day_codes_follow_registry_branches() {
    let cases = [
        (101, 0),
        (131, 30),
        (201, 31),
        (229, 59),
        (301, 60),
        (399, 158),
        (400, 90),
        (401, 91),
        (1231, 921),
    ];
    for (code, expected) in cases {
        assert_eq!(ge_to_dayofyear(code), expected, "GE {code}");
    }
    assert_eq!(dayofyear_to_date(ge_to_dayofyear(101), 2020), Some(ymd(1, 1)));
    assert_eq!(dayofyear_to_date(ge_to_dayofyear(229), 2020), Some(ymd(2, 29)));
    assert_eq!(dayofyear_to_date(ge_to_dayofyear(301), 2020), Some(ymd(3, 1)));
    assert_eq!(dayofyear_to_date(ge_to_dayofyear(401), 2020), Some(ymd(4, 1)));
}

#[test]
fn age_codes_map_to_brackets() {
    assert_eq!(age_class_label(1), "0-49");
    assert_eq!(age_class_label(10), "0-49");
    assert_eq!(age_class_label(11), "50-59");
    assert_eq!(age_class_label(12), "50-59");
    assert_eq!(age_class_label(13), "60-69");
    assert_eq!(age_class_label(18), "80-89");
    assert_eq!(age_class_label(19), "90+");
    assert_eq!(age_class_label(21), "90+");
}

proptest! {
    #[test]
    fn age_labels_come_from_fixed_table(code in -5i64..40) {
        let label = age_class_label(code);
        prop_assert!(AGE_CLASSES.contains(&label.as_str()));
    }
}

#[test]
fn sums_rows_into_dense_array() {
    let file = registry_file();
    let (frame, array) = istat_to_array_path(file.path(), &RegistryOptions::default()).unwrap();

    assert_eq!(frame.height(), 3);
    assert_eq!(frame.width(), 16);
    let ages: Vec<&str> = frame
        .column("age_class")
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(ages, ["50-59", "50-59", "0-49"]);
    assert_eq!(frame.column("time").unwrap().dtype(), &DataType::Date);

    assert_eq!(array.name(), Some("deaths"));
    assert_eq!(array.dims(), ["year", "time", "age_class", "location"]);
    assert_eq!(array.shape(), [6, 2, 2, 2]);
    array.validate().unwrap();

    assert_eq!(
        array.coord("year").unwrap().values(),
        &CoordValues::Int(vec![2015, 2016, 2017, 2018, 2019, 2020])
    );
    assert_eq!(
        array.coord("time").unwrap().values(),
        &CoordValues::Date(vec![ymd(1, 1), ymd(2, 1)])
    );
    assert_eq!(
        text(array.coord("age_class").unwrap().values()),
        ["0-49", "50-59"]
    );
    assert_eq!(
        text(array.coord("location").unwrap().values()),
        ["Bergamo", "Forl\u{ec}"]
    );
    assert_eq!(
        text(array.coord("region").unwrap().values()),
        ["Lombardia", "Emilia-Romagna"]
    );
    assert_eq!(
        text(array.coord("province").unwrap().values()),
        ["Bergamo", "Forl\u{ec}-Cesena"]
    );

    // 2020, Jan 1st, 50-59, Bergamo: two age codes share the bracket.
    assert_eq!(at(&array, [5, 0, 1, 0]), 5.0);
    assert_eq!(at(&array, [4, 0, 1, 0]), 2.0);
    assert_eq!(at(&array, [0, 0, 1, 0]), 1.0);
    // Missing 2015 total counts as zero.
    assert_eq!(at(&array, [0, 1, 0, 1]), 0.0);
    assert_eq!(at(&array, [5, 1, 0, 1]), 1.0);
    // No Bergamo deaths under 50.
    assert_eq!(at(&array, [5, 0, 0, 0]), 0.0);
}

#[test]
fn keeps_rows_without_current_total_when_asked() {
    let file = registry_file();
    let options = RegistryOptions::default().with_drop_missing(false);
    let (frame, array) = istat_to_array_path(file.path(), &options).unwrap();

    assert_eq!(frame.height(), 4);
    assert_eq!(array.shape(), [6, 3, 3, 2]);
    assert_eq!(
        text(array.coord("age_class").unwrap().values()),
        ["0-49", "50-59", "90+"]
    );
    // 2020-02-29, 90+, Forlì: the current-year total was the sentinel.
    assert_eq!(at(&array, [5, 2, 2, 1]), 0.0);
    assert_eq!(at(&array, [0, 2, 2, 1]), 1.0);
}

#[test]
fn records_carry_decoded_fields() {
    let csv = "NOME_REGIONE,NOME_PROVINCIA,NOME_COMUNE,CL_ETA,GE,\
TOTALE_15,TOTALE_16,TOTALE_17,TOTALE_18,TOTALE_19,TOTALE_20
Lazio,Roma,Roma,18,314,1,2,3,4,5,6
";
    let table = read_csv_str(csv, &IngestOptions::default()).unwrap();
    let records = istat_to_records(&table, &RegistryOptions::default()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].time, ymd(3, 14));
    assert_eq!(records[0].age_class, "80-89");
    assert_eq!(records[0].totals, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
}

#[test]
fn non_numeric_day_code_is_rejected() {
    let csv = "NOME_REGIONE,NOME_PROVINCIA,NOME_COMUNE,CL_ETA,GE,\
TOTALE_15,TOTALE_16,TOTALE_17,TOTALE_18,TOTALE_19,TOTALE_20
Lazio,Roma,Roma,18,abc,1,2,3,4,5,6
";
    let table = read_csv_str(csv, &IngestOptions::default()).unwrap();
    let err = istat_to_array(&table, &RegistryOptions::default()).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"invalid GE value 'abc' in row 0");
}

#[test]
fn missing_year_column_is_rejected() {
    let csv = "NOME_REGIONE,NOME_PROVINCIA,NOME_COMUNE,CL_ETA,GE,TOTALE_20
Lazio,Roma,Roma,1,101,1
";
    let table = read_csv_str(csv, &IngestOptions::default()).unwrap();
    let err = istat_to_array(&table, &RegistryOptions::default()).unwrap_err();
    assert!(matches!(err, TransformError::MissingColumn { column } if column == "TOTALE_15"));
}

#[test]
fn current_year_selects_columns_and_calendar() {
    let csv = "NOME_REGIONE,NOME_PROVINCIA,NOME_COMUNE,CL_ETA,GE,\
TOTALE_16,TOTALE_17,TOTALE_18,TOTALE_19,TOTALE_20,TOTALE_21
Lazio,Roma,Roma,3,301,1,2,3,4,5,6
";
    let table = read_csv_str(csv, &IngestOptions::default()).unwrap();
    let options = RegistryOptions::default().with_current_year(2021);
    let (_, array) = istat_to_array(&table, &options).unwrap();

    assert_eq!(
        array.coord("year").unwrap().values(),
        &CoordValues::Int(vec![2016, 2017, 2018, 2019, 2020, 2021])
    );
    // 2021 has no February 29th, so code 301 lands on March 2nd.
    assert_eq!(
        array.coord("time").unwrap().values(),
        &CoordValues::Date(vec![NaiveDate::from_ymd_opt(2021, 3, 2).unwrap()])
    );
    assert_eq!(at(&array, [5, 0, 0, 0]), 6.0);
}
