#[cfg(feature = "json")]
use kwadro_io::JsonStore;
use kwadro_io::{CellValue, ColumnAddress, Document, GridStore};

fn col(letters: &str) -> ColumnAddress {
    ColumnAddress::parse(letters).unwrap()
}

#[cfg(feature = "json")]
#[test]
fn json_roundtrip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clients.json");

    let mut store = JsonStore::create();
    store.create_sheet("Clients", None).unwrap();
    store
        .write_cell("Clients", col("A"), 1, CellValue::from("Joshua King"))
        .unwrap();
    store
        .write_cell("Clients", col("B"), 1, CellValue::Int(123))
        .unwrap();
    let born = chrono::NaiveDate::from_ymd_opt(1990, 5, 17).unwrap();
    store
        .write_cell("Clients", col("C"), 2, CellValue::Date(born))
        .unwrap();
    store.save_path(&path).unwrap();

    let reopened = JsonStore::open_path(&path).unwrap();
    assert_eq!(reopened.sheet_names(), vec!["Clients"]);
    assert_eq!(
        reopened.read_cell("Clients", col("A"), 1).unwrap(),
        CellValue::from("Joshua King")
    );
    assert_eq!(
        reopened.read_cell("Clients", col("B"), 1).unwrap(),
        CellValue::Int(123)
    );
    assert_eq!(
        reopened.read_cell("Clients", col("C"), 2).unwrap(),
        CellValue::Date(born)
    );
    assert_eq!(reopened.max_row("Clients").unwrap(), 2);
}

#[cfg(feature = "json")]
#[test]
fn json_document_shape() {
    let mut store = JsonStore::new();
    store.create_sheet("Sheet1", None).unwrap();
    store
        .write_cell("Sheet1", col("B"), 3, CellValue::Number(42.0))
        .unwrap();

    let s = store.to_json_string().unwrap();
    let v: serde_json::Value = serde_json::from_str(&s).unwrap();

    assert_eq!(v["version"], 1);
    assert_eq!(v["sheets"][0]["name"], "Sheet1");
    assert_eq!(v["sheets"][0]["cells"][0]["row"], 3);
    assert_eq!(v["sheets"][0]["cells"][0]["col"], 2);
    assert_eq!(v["sheets"][0]["cells"][0]["value"]["type"], "Number");
    assert_eq!(v["sheets"][0]["cells"][0]["value"]["value"], 42.0);
}

#[cfg(feature = "json")]
#[test]
fn json_open_bytes_keeps_sheet_order() {
    let raw = br#"{
        "sheets": [
            {"name": "Zeta", "cells": []},
            {"name": "Alpha", "cells": [{"row": 1, "col": 1, "value": {"type": "Boolean", "value": true}}]}
        ]
    }"#;
    let store = JsonStore::open_bytes(raw).unwrap();
    assert_eq!(store.sheet_names(), vec!["Zeta", "Alpha"]);
    assert_eq!(
        store.read_cell("Alpha", col("A"), 1).unwrap(),
        CellValue::Boolean(true)
    );
    assert_eq!(store.max_row("Zeta").unwrap(), 1);
}

#[cfg(feature = "json")]
#[test]
fn json_open_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = JsonStore::open_path(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, kwadro_io::StoreError::Io(_)));
}
