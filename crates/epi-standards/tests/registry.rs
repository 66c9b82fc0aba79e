use std::fs;

use epi_standards::{SchemaRegistry, StandardsError, TimeSeriesLayout, file_name};

#[test]
fn resolves_named_streams() {
    let registry = SchemaRegistry::builtin();
    let url = registry.resolve("usa", "deaths").unwrap();
    assert_eq!(
        url,
        "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/\
         csse_covid_19_time_series/time_series_covid19_deaths_US.csv"
    );
    assert_eq!(file_name(&url), "time_series_covid19_deaths_US.csv");

    let url = registry.resolve("italy", "regioni").unwrap();
    assert_eq!(
        url,
        "https://raw.githubusercontent.com/pcm-dpc/COVID-19/master/dati-regioni/dpc-covid19-ita-regioni.csv"
    );
}

#[test]
fn unknown_stream_passes_through_as_template() {
    let registry = SchemaRegistry::builtin();
    let url = registry.resolve("italy", "{url}/dati-json/x.json").unwrap();
    assert_eq!(
        url,
        "https://raw.githubusercontent.com/pcm-dpc/COVID-19/master/dati-json/x.json"
    );
}

#[test]
fn unknown_repository_is_an_error() {
    let err = SchemaRegistry::builtin().resolve("mars", "deaths").unwrap_err();
    assert!(matches!(err, StandardsError::UnknownRepository { ref name } if name == "mars"));
    insta::assert_snapshot!(err.to_string(), @"unknown repository: mars");
}

#[test]
fn unknown_layout_is_an_error() {
    let err = SchemaRegistry::builtin().layout("italy").unwrap_err();
    assert!(matches!(err, StandardsError::UnknownLayout { .. }));
}

#[test]
fn loads_and_merges_toml_registry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry.toml");
    fs::write(
        &path,
        r#"
[repos.world]
url = "https://mirror.example.org/jhu"

[repos.world.streams]
deaths = "{url}/deaths_global.csv"

[layouts.custom]
date_start = 2
country = "Country"
state = "Region"
"#,
    )
    .unwrap();

    let overrides = SchemaRegistry::load(&path).unwrap();
    let registry = SchemaRegistry::builtin().merge(overrides);

    assert_eq!(
        registry.resolve("world", "deaths").unwrap(),
        "https://mirror.example.org/jhu/deaths_global.csv"
    );
    // replaced wholesale: the mirror does not publish cases
    assert_eq!(
        registry.resolve("world", "cases").unwrap(),
        "cases"
    );
    assert_eq!(
        registry.layout("custom").unwrap(),
        &TimeSeriesLayout::new(2, "Country", "Region")
    );
    assert_eq!(registry.layout("usa").unwrap().date_start, 16);
}

#[test]
fn rejects_invalid_toml() {
    let err = SchemaRegistry::from_toml_str("[repos.world]\nstreams = 3\n").unwrap_err();
    assert!(matches!(err, StandardsError::Toml { .. }));

    let err = SchemaRegistry::from_toml_str("[repos.world]\nurl = \" \"\n").unwrap_err();
    assert!(matches!(err, StandardsError::InvalidEntry { .. }));
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = SchemaRegistry::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, StandardsError::Io { .. }));
}
