#![cfg(feature = "json")]

use chrono::NaiveDate;
use kwadro::{
    Board, BoardConfig, CellValue, Filter, GridStore, JsonStore, KwadroError, MemoryStore, Record,
    RecordType, StoreError,
};

fn clients() -> RecordType {
    RecordType::builder("Clients")
        .column("name", 1)
        .column("phone", 2)
        .column("address", "C")
        .column("country", 4)
        .column("since", "E")
        .build()
        .unwrap()
}

#[test]
fn open_missing_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.json");
    let board: Board<JsonStore> = Board::open(&path, BoardConfig::default()).unwrap();
    assert!(board.store().sheet_names().is_empty());
    assert_eq!(board.path(), Some(path.as_path()));
    assert!(!path.exists());
}

#[test]
fn saved_rows_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.json");
    let ty = clients();
    let since = NaiveDate::from_ymd_opt(2021, 3, 9).unwrap();

    {
        let board: Board<JsonStore> = Board::open(&path, BoardConfig::default()).unwrap();
        board.create_sheet(&ty, None, false).unwrap();
        let entry = ty.record_with([
            ("name", CellValue::from("Joshua King")),
            ("phone", CellValue::from(123)),
            ("country", CellValue::from("Australia")),
            ("since", CellValue::from(since)),
        ]);
        board.add(&entry).unwrap();
        board
            .add(&ty.record_with([("name", "Mia Park"), ("country", "Korea")]))
            .unwrap();
        board.save_in_place().unwrap();
    }

    let board: Board<JsonStore> = Board::open(&path, BoardConfig::default()).unwrap();
    assert_eq!(board.last_row(&ty).unwrap(), 2);
    let filter = Filter::new().equals("country", "Australia");
    let found = board.find(&ty, &filter).unwrap().unwrap();
    assert_eq!(found.row(), Some(1));
    assert_eq!(found.get("phone").unwrap(), CellValue::Int(123));
    assert_eq!(found.get("since").unwrap(), CellValue::Date(since));
    assert_eq!(found.get("address").unwrap(), CellValue::Empty);
}

#[test]
fn boards_over_one_file_do_not_share_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.json");
    let ty = clients();

    let first: Board<JsonStore> = Board::open(&path, BoardConfig::default()).unwrap();
    first
        .create_and_add(&ty.record_with([("name", "A")]), None, false)
        .unwrap();
    first.save_in_place().unwrap();

    let second: Board<JsonStore> = Board::open(&path, BoardConfig::default()).unwrap();
    let a = first.get(&ty, 1).unwrap();
    let b = second.get(&ty, 1).unwrap();
    assert!(!Record::ptr_eq(&a, &b));

    b.set("name", "B").unwrap();
    assert_eq!(a.get("name").unwrap(), CellValue::from("A"));
}

#[test]
fn force_new_ignores_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.json");
    let ty = clients();

    let board: Board<JsonStore> = Board::open(&path, BoardConfig::default()).unwrap();
    board
        .create_and_add(&ty.record_with([("name", "A")]), None, false)
        .unwrap();
    board.save_in_place().unwrap();

    let fresh: Board<JsonStore> = Board::open(&path, BoardConfig::fresh()).unwrap();
    assert!(!fresh.has_sheet(&ty));
}

#[test]
fn save_to_another_path() {
    let dir = tempfile::tempdir().unwrap();
    let copy = dir.path().join("copy.json");
    let ty = clients();

    let board = Board::new(JsonStore::new());
    board
        .create_and_add(&ty.record_with([("name", "A")]), None, false)
        .unwrap();
    assert!(matches!(board.save_in_place(), Err(KwadroError::NoPath)));
    board.save(&copy).unwrap();

    let reopened: Board<JsonStore> = Board::open(&copy, BoardConfig::default()).unwrap();
    assert_eq!(reopened.last_row(&ty).unwrap(), 1);
}

#[test]
fn corrupt_file_is_a_store_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.json");
    std::fs::write(&path, b"{ not json").unwrap();
    let err = Board::<JsonStore>::open(&path, BoardConfig::default()).unwrap_err();
    assert!(matches!(err, KwadroError::Store(StoreError::Json(_))));
}

#[test]
fn memory_store_cannot_be_opened() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.json");
    std::fs::write(&path, b"{}").unwrap();
    let err = Board::<MemoryStore>::open(&path, BoardConfig::default()).unwrap_err();
    assert!(matches!(err, KwadroError::Store(StoreError::Unsupported(_))));
}
