use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
use daily_photo::availability::AvailabilityIndex;
use daily_photo::civil_clock::CivilClock;
use daily_photo::metadata_store::MetadataStore;
use daily_photo::navigation::{nearest, resolve, Direction, DisplayState, PlaceholderReason};
use daily_photo::photo_ingest::{NewPhoto, PhotoLibrary};
use daily_photo::photo_types::sort_newest_first;
use tempfile::TempDir;

fn date(value: &str) -> NaiveDate {
    value.parse().unwrap()
}

fn create_library(today: &str) -> (PhotoLibrary, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let upload_dir = temp_dir.path().join("uploads");
    let store = MetadataStore::new(upload_dir.join("metadata.json"));
    let clock = CivilClock::new(FixedOffset::west_opt(8 * 3600).unwrap(), Some(date(today)));
    (PhotoLibrary::new(upload_dir, store, clock), temp_dir)
}

fn photo(day: &str, caption: &str) -> NewPhoto {
    NewPhoto {
        data: format!("bytes for {}", caption).into_bytes(),
        original_name: Some("upload.jpeg".to_string()),
        date: Some(day.to_string()),
        caption: caption.to_string(),
        ..Default::default()
    }
}

#[test]
fn test_distinct_dates_list_one_record_each_newest_first() {
    let (library, _temp_dir) = create_library("2025-03-01");
    let days = ["2025-01-15", "2025-02-27", "2025-01-01", "2025-02-14"];
    for (i, day) in days.iter().enumerate() {
        let now = Utc.timestamp_millis_opt(1_740_000_000_000 + i as i64).unwrap();
        library.ingest_at(photo(day, day), now).unwrap();
    }

    let mut records = library.load();
    sort_newest_first(&mut records);

    let listed: Vec<String> = records.iter().map(|r| r.date.to_string()).collect();
    assert_eq!(
        listed,
        vec!["2025-02-27", "2025-02-14", "2025-01-15", "2025-01-01"]
    );
}

#[test]
fn test_replacement_keeps_single_record_and_drops_old_binary() {
    let (library, _temp_dir) = create_library("2025-03-01");
    let first = library
        .ingest_at(photo("2025-02-27", "draft"), Utc.timestamp_millis_opt(1_740_000_000_000).unwrap())
        .unwrap();
    let second = library
        .ingest_at(photo("2025-02-27", "final"), Utc.timestamp_millis_opt(1_740_000_009_000).unwrap())
        .unwrap();

    let records = library.load();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].caption, "final");
    assert_eq!(records[0].file_name, second.photo.file_name);
    assert_ne!(first.photo.file_name, second.photo.file_name);
    assert!(!library.upload_dir().join(&first.photo.file_name).exists());
    assert!(library.upload_dir().join(&second.photo.file_name).exists());
}

#[test]
fn test_navigation_over_stored_photos() {
    let (library, _temp_dir) = create_library("2025-03-01");
    for (i, day) in ["2025-01-01", "2025-01-15", "2025-02-27"].iter().enumerate() {
        let now = Utc.timestamp_millis_opt(1_740_000_000_000 + i as i64).unwrap();
        library.ingest_at(photo(day, day), now).unwrap();
    }

    let records = library.load();
    let index = AvailabilityIndex::from_records(&records);

    assert_eq!(
        nearest(&index, date("2025-02-27"), Direction::Prev),
        Some(date("2025-01-15"))
    );
    assert_eq!(
        nearest(&index, date("2025-01-01"), Direction::Next),
        Some(date("2025-01-15"))
    );
    assert_eq!(nearest(&index, date("2025-01-01"), Direction::Prev), None);

    let today = library.today();
    assert_eq!(
        resolve(&records, Some(today), today),
        DisplayState::Placeholder {
            date: date("2025-03-01"),
            reason: PlaceholderReason::Today
        }
    );
}

#[test]
fn test_corrupt_store_degrades_to_no_photos() {
    let (library, _temp_dir) = create_library("2025-03-01");
    library
        .ingest_at(photo("2025-02-27", "kept"), Utc.timestamp_millis_opt(1_740_000_000_000).unwrap())
        .unwrap();
    std::fs::write(library.store().path(), "[{\"broken\": ").unwrap();

    assert!(library.load().is_empty());
    let state = resolve(&library.load(), None, library.today());
    assert!(state.is_placeholder());
}
