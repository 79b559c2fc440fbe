//! Tests for the data store coordinator
//!
//! These tests verify:
//! - Loading delimited text into records plus a header block
//! - Lifecycle transitions (Untouched → Built → Indexed → Queryable)
//! - Index persistence and reuse across store instances
//! - Append invalidation and configuration validation

use std::io::Cursor;
use std::path::Path;

use tempfile::TempDir;
use zipstore::{Config, DataStore, SizeFormat, StoreError, StoreState};

// =============================================================================
// Helper Functions
// =============================================================================

const ZIP_SOURCE: &str = "\
Zip,Name,State
77036,Houston,TX
10001,New York,NY
90210,Beverly Hills,CA
";

fn setup_store() -> (TempDir, DataStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = DataStore::open_path(temp_dir.path()).unwrap();
    (temp_dir, store)
}

fn loaded_store() -> (TempDir, DataStore) {
    let (temp_dir, mut store) = setup_store();
    store.load_lines(Cursor::new(ZIP_SOURCE)).unwrap();
    (temp_dir, store)
}

fn config_for(dir: &Path) -> Config {
    Config::builder().data_dir(dir).build()
}

// =============================================================================
// Loading Tests
// =============================================================================

#[test]
fn test_new_store_is_untouched() {
    let (_temp, store) = setup_store();

    assert_eq!(store.state(), StoreState::Untouched);
    assert!(store.header().is_none());
    assert!(store.index().is_none());
}

#[test]
fn test_load_lines_writes_records_and_header() {
    let (temp, mut store) = setup_store();

    let header = store.load_lines(Cursor::new(ZIP_SOURCE)).unwrap();

    assert_eq!(store.state(), StoreState::Built);
    assert_eq!(header.record_count(), 3);
    assert_eq!(header.field_names(), ["Zip", "Name", "State"]);
    assert_eq!(header.file_name(), "records.dat");
    assert!(temp.path().join("records.dat").exists());
    assert!(temp.path().join("records.hdr").exists());
}

#[test]
fn test_load_lines_handles_crlf_and_blank_lines() {
    let (_temp, mut store) = setup_store();
    let source = "Zip,Name,State\r\n77036,Houston,TX\r\n\r\n10001,New York,NY\r\n";

    let header = store.load_lines(Cursor::new(source)).unwrap();
    assert_eq!(header.record_count(), 2);
    assert_eq!(header.field_names(), ["Zip", "Name", "State"]);

    store.build_index().unwrap();
    assert_eq!(
        store.get("77036").unwrap(),
        Some(b"77036,Houston,TX".to_vec())
    );
}

#[test]
fn test_load_lines_empty_source() {
    let (_temp, mut store) = setup_store();

    assert!(matches!(
        store.load_lines(Cursor::new("")),
        Err(StoreError::MalformedHeader(_))
    ));
}

#[test]
fn test_load_lines_header_only() {
    let (_temp, mut store) = setup_store();

    let header = store.load_lines(Cursor::new("Zip,Name,State\n")).unwrap();

    assert_eq!(header.record_count(), 0);
    assert_eq!(store.state(), StoreState::Untouched);
}

#[test]
fn test_load_replaces_previous_contents() {
    let (_temp, mut store) = loaded_store();

    store
        .load_lines(Cursor::new("Zip,Name\n55555,Elsewhere\n"))
        .unwrap();
    store.build_index().unwrap();

    assert_eq!(store.index().unwrap().len(), 1);
    assert_eq!(store.lookup("77036").unwrap(), None);
    assert_eq!(store.lookup("55555").unwrap(), Some(0));
}

#[test]
fn test_rejected_header_leaves_store_untouched() {
    let (temp, mut store) = loaded_store();
    store.build_index().unwrap();
    let data_path = temp.path().join("records.dat");
    let before = std::fs::read(&data_path).unwrap();

    let result = store.load_lines(Cursor::new("Zip Code,Place Name\n90210,Beverly Hills\n"));

    assert!(matches!(result, Err(StoreError::MalformedHeader(_))));
    assert_eq!(std::fs::read(&data_path).unwrap(), before);
    assert_eq!(store.state(), StoreState::Indexed);
    assert_eq!(
        store.get("10001").unwrap(),
        Some(b"10001,New York,NY".to_vec())
    );
}

#[test]
fn test_failed_load_drops_index() {
    let (temp, mut store) = loaded_store();
    store.build_index().unwrap();

    // Records are written, then the header file cannot be created
    let header_path = temp.path().join("records.hdr");
    std::fs::remove_file(&header_path).unwrap();
    std::fs::create_dir(&header_path).unwrap();

    let result = store.load_lines(Cursor::new("Zip,Name\n55555,Elsewhere\n"));

    assert!(matches!(result, Err(StoreError::Io(_))));
    assert_eq!(store.state(), StoreState::Built);
    assert!(store.header().is_none());
    assert!(matches!(store.lookup("10001"), Err(StoreError::IndexNotReady)));

    store.build_index().unwrap();
    assert_eq!(store.lookup("55555").unwrap(), Some(0));
    assert_eq!(store.lookup("10001").unwrap(), None);
}

#[test]
fn test_load_binary_header() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp.path())
        .size_format(SizeFormat::Binary)
        .build();
    let mut store = DataStore::open(config).unwrap();

    store.load_lines(Cursor::new(ZIP_SOURCE)).unwrap();
    let header = store.read_header().unwrap();

    assert_eq!(header.size_format(), SizeFormat::Binary);
    assert_eq!(header.field_names(), ["Zip", "Name", "State"]);
}

// =============================================================================
// Index Lifecycle Tests
// =============================================================================

#[test]
fn test_lookup_before_index_fails() {
    let (_temp, store) = loaded_store();

    assert!(matches!(store.lookup("77036"), Err(StoreError::IndexNotReady)));
    assert!(matches!(store.get("77036"), Err(StoreError::IndexNotReady)));
    assert!(matches!(store.persist_index(), Err(StoreError::IndexNotReady)));
}

#[test]
fn test_build_index_then_lookup() {
    let (_temp, mut store) = loaded_store();

    let entries = store.build_index().unwrap().len();

    assert_eq!(entries, 3);
    assert_eq!(store.state(), StoreState::Indexed);
    assert_eq!(store.lookup("77036").unwrap(), Some(0));
    assert_eq!(store.lookup("10001").unwrap(), Some(24));
    assert_eq!(store.lookup("90210").unwrap(), Some(49));
    assert_eq!(store.lookup("00000").unwrap(), None);
}

#[test]
fn test_get_returns_payload() {
    let (_temp, mut store) = loaded_store();
    store.build_index().unwrap();

    assert_eq!(
        store.get("90210").unwrap(),
        Some(b"90210,Beverly Hills,CA".to_vec())
    );
    assert_eq!(store.get("00000").unwrap(), None);
}

#[test]
fn test_persisted_index_reused_by_new_store() {
    let (temp, mut store) = loaded_store();
    store.build_index().unwrap();
    store.persist_index().unwrap();
    let built = store.index().unwrap().clone();
    drop(store);

    let mut reopened = DataStore::open(config_for(temp.path())).unwrap();
    assert_eq!(reopened.state(), StoreState::Built);

    reopened.load_index().unwrap();

    assert_eq!(reopened.state(), StoreState::Queryable);
    assert_eq!(reopened.index().unwrap(), &built);
    assert_eq!(
        reopened.get("10001").unwrap(),
        Some(b"10001,New York,NY".to_vec())
    );
}

#[test]
fn test_load_index_without_sidecar() {
    let (_temp, mut store) = loaded_store();

    assert!(matches!(store.load_index(), Err(StoreError::Io(_))));
}

#[test]
fn test_append_invalidates_index() {
    let (_temp, mut store) = loaded_store();
    store.build_index().unwrap();

    let offset = store.append(b"60601,Chicago,IL").unwrap();

    assert_eq!(offset, 79);
    assert_eq!(store.state(), StoreState::Built);
    assert!(matches!(store.lookup("60601"), Err(StoreError::IndexNotReady)));

    store.build_index().unwrap();
    assert_eq!(store.lookup("60601").unwrap(), Some(79));
    assert_eq!(store.index().unwrap().len(), 4);
}

#[test]
fn test_append_to_untouched_store() {
    let (_temp, mut store) = setup_store();

    assert_eq!(store.append(b"12345,First,ST").unwrap(), 0);
    assert_eq!(store.state(), StoreState::Built);
}

// =============================================================================
// Reopen / Header Tests
// =============================================================================

#[test]
fn test_reopen_reads_existing_header() {
    let (temp, store) = loaded_store();
    drop(store);

    let reopened = DataStore::open(config_for(temp.path())).unwrap();
    let header = reopened.header().unwrap();

    assert_eq!(header.file_name(), "records.dat");
    assert_eq!(header.field_names(), ["Zip", "Name", "State"]);
}

#[test]
fn test_reopen_with_corrupt_header_still_opens() {
    let (temp, store) = loaded_store();
    drop(store);
    std::fs::write(temp.path().join("records.hdr"), "garbage").unwrap();

    let mut reopened = DataStore::open(config_for(temp.path())).unwrap();

    assert!(reopened.header().is_none());
    assert_eq!(reopened.state(), StoreState::Built);
    assert!(reopened.read_header().is_err());
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_paths() {
    let config = Config::builder()
        .data_dir("/tmp/zips")
        .data_file_name("zips.dat")
        .header_file_name("zips.hdr")
        .index_file_name("zips.idx")
        .build();

    assert_eq!(config.data_path(), Path::new("/tmp/zips/zips.dat"));
    assert_eq!(config.header_path(), Path::new("/tmp/zips/zips.hdr"));
    assert_eq!(config.index_path(), Path::new("/tmp/zips/zips.idx"));
}

#[test]
fn test_config_rejects_clashing_file_names() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp.path())
        .data_file_name("same.txt")
        .index_file_name("same.txt")
        .build();

    assert!(matches!(DataStore::open(config), Err(StoreError::Config(_))));
}

#[test]
fn test_config_rejects_whitespace_file_name() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp.path())
        .data_file_name("my records.dat")
        .build();

    assert!(matches!(DataStore::open(config), Err(StoreError::Config(_))));
}

#[test]
fn test_config_rejects_unsupported_key_ordinality() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp.path())
        .primary_key_ordinality(2)
        .build();

    assert!(matches!(DataStore::open(config), Err(StoreError::Config(_))));
}

#[test]
fn test_header_records_key_ordinality() {
    let (_temp, store) = loaded_store();

    assert_eq!(store.header().unwrap().primary_key_ordinality(), 1);
}

#[test]
fn test_config_custom_delimiter() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp.path())
        .field_delimiter(b'|')
        .build();
    let mut store = DataStore::open(config).unwrap();

    store
        .load_lines(Cursor::new("Zip,Name\n77036|Houston\n"))
        .unwrap();
    store.build_index().unwrap();

    assert_eq!(store.lookup("77036").unwrap(), Some(0));
}
