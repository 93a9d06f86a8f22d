//! File-level round trips for the JSON and CSV writers and readers.

use proptest::prelude::*;
use tickerlist_core::export::{read_csv, read_json, write_csv, write_json, write_records};
use tickerlist_core::{ListingRecord, OutputFormat};

fn sample() -> Vec<ListingRecord> {
    vec![
        ListingRecord::named("MSFT", Some("Microsoft Corporation".into())),
        ListingRecord::named("BRK.B", Some("Berkshire Hathaway Inc., Class B".into())),
        ListingRecord::named("NONAME", None),
        ListingRecord::named("MSFT", Some("Microsoft Corporation".into())),
    ]
}

#[test]
fn json_file_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    write_json(&sample(), &path).unwrap();
    assert_eq!(read_json(&path).unwrap(), sample());
}

#[test]
fn csv_file_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    write_csv(&sample(), &path, false).unwrap();
    assert_eq!(read_csv(&path, false).unwrap(), sample());
}

#[test]
fn writers_overwrite_existing_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    std::fs::write(&path, "stale content that is much longer than the new output").unwrap();

    write_records(&[ListingRecord::ticker("A")], &path, OutputFormat::Json, true).unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "[\n    {\n        \"symbol\": \"A\"\n    }\n]"
    );
}

fn symbol_strategy() -> impl Strategy<Value = String> {
    "[A-Z]{1,5}(\\.[A-Z])?"
}

proptest! {
    #[test]
    fn csv_and_json_keep_count_and_order(
        symbols in prop::collection::vec(symbol_strategy(), 1..30),
        ticker_only in any::<bool>(),
    ) {
        let records: Vec<ListingRecord> = symbols
            .iter()
            .map(|s| {
                if ticker_only {
                    ListingRecord::ticker(s.clone())
                } else {
                    ListingRecord::named(s.clone(), Some(format!("{s}, Inc.")))
                }
            })
            .collect();

        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("out.json");
        let csv_path = dir.path().join("out.csv");
        write_json(&records, &json_path).unwrap();
        write_csv(&records, &csv_path, ticker_only).unwrap();

        let from_json = read_json(&json_path).unwrap();
        let from_csv = read_csv(&csv_path, ticker_only).unwrap();
        prop_assert_eq!(&from_json, &records);
        prop_assert_eq!(&from_csv, &records);
    }
}
