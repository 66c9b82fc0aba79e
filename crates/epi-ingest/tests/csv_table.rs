use std::fs;

use epi_ingest::{IngestError, IngestOptions, SourceEncoding, read_csv_table};

#[test]
fn reads_latin1_registry_with_sentinels() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comuni.csv");
    let mut bytes = b"NOME_COMUNE,GE,TOTALE_19,TOTALE_20\n".to_vec();
    bytes.extend_from_slice(b"Forl\xec,0301,4,9999\n");
    bytes.extend_from_slice(b"Cant\xf9,0302,9999,2\n");
    fs::write(&path, bytes).unwrap();

    let options = IngestOptions::default()
        .with_encoding(SourceEncoding::Latin1)
        .with_na_value("9999");
    let table = read_csv_table(&path, &options).unwrap();

    assert_eq!(table.height(), 2);
    assert_eq!(table.cell(0, 0), "Forlì");
    assert_eq!(table.cell(1, 0), "Cantù");
    assert_eq!(table.cell(0, 3), "");
    assert_eq!(table.cell(1, 2), "");
    assert_eq!(table.cell(1, 3), "2");
}

#[test]
fn latin1_control_range_is_decoded_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comuni.csv");
    fs::write(&path, b"NOME_COMUNE\nx\x80y\n").unwrap();

    let options = IngestOptions::default().with_encoding(SourceEncoding::Latin1);
    let table = read_csv_table(&path, &options).unwrap();
    assert_eq!(table.cell(0, 0), "x\u{80}y");
}

#[test]
fn latin1_bytes_are_not_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comuni.csv");
    fs::write(&path, b"NOME_COMUNE\nForl\xec\n").unwrap();

    let err = read_csv_table(&path, &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::InvalidEncoding { encoding: "UTF-8", .. }));
}

#[test]
fn keeps_empty_cells_and_quoted_commas() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("global.csv");
    fs::write(
        &path,
        "Province/State,Country/Region,Lat,Long,1/22/20\n,\"Korea, South\",35.9,127.7,0\n",
    )
    .unwrap();

    let table = read_csv_table(&path, &IngestOptions::default()).unwrap();
    assert_eq!(table.width(), 5);
    assert_eq!(table.cell(0, 0), "");
    assert_eq!(table.cell(0, 1), "Korea, South");
    assert_eq!(table.column_index("1/22/20"), Some(4));
}
