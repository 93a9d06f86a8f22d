//! Per-ticker liveness check and name enrichment.
//!
//! One lookup call per ticker, in input order. `LookupMiss` drops the ticker;
//! any other lookup error aborts the batch, after the HTTP layer has spent its
//! retries. Nothing is written until the whole batch succeeds.

use crate::data::{ListingError, QuoteLookup};
use crate::domain::ListingRecord;
use std::io::Write;
use tracing::{debug, info};

/// Classify one ticker.
///
/// Returns `None` when the lookup has no data or reports no current-session
/// price. With `want_name` the record carries the lookup's long name, which
/// may itself be absent.
pub fn classify(
    lookup: &dyn QuoteLookup,
    ticker: &str,
    want_name: bool,
) -> Result<Option<ListingRecord>, ListingError> {
    let snapshot = match lookup.snapshot(ticker) {
        Ok(snapshot) => snapshot,
        Err(e) if e.is_lookup_miss() => {
            debug!(ticker, "lookup miss, dropping");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    if !snapshot.is_active() {
        debug!(ticker, "no current-session price, dropping");
        return Ok(None);
    }

    Ok(Some(if want_name {
        ListingRecord::named(ticker, snapshot.long_name)
    } else {
        ListingRecord::ticker(ticker)
    }))
}

/// Classify every ticker, keeping input order and dropping absent results.
pub fn classify_all(
    lookup: &dyn QuoteLookup,
    tickers: &[String],
    want_name: bool,
    progress: &dyn ClassifyProgress,
) -> Result<Vec<ListingRecord>, ListingError> {
    let total = tickers.len();
    let label = if want_name {
        "Fetching Ticker data"
    } else {
        "Checking Ticker active"
    };
    progress.on_start(label, total);

    let mut records = Vec::with_capacity(total);
    for (i, ticker) in tickers.iter().enumerate() {
        let record = classify(lookup, ticker, want_name)?;
        progress.on_ticker(ticker, i, total, record.is_some());
        if let Some(record) = record {
            records.push(record);
        }
    }

    progress.on_batch_complete(records.len(), total);
    info!(
        lookup = lookup.name(),
        kept = records.len(),
        dropped = total - records.len(),
        "classification complete"
    );
    Ok(records)
}

/// Progress callback for the classification loop.
pub trait ClassifyProgress: Send {
    /// Called once before the first lookup.
    fn on_start(&self, label: &str, total: usize);

    /// Called after each ticker is classified.
    fn on_ticker(&self, symbol: &str, index: usize, total: usize, kept: bool);

    /// Called when the whole batch is done.
    fn on_batch_complete(&self, kept: usize, total: usize);
}

/// Single-line progress counter on stderr.
pub struct StderrProgress;

impl ClassifyProgress for StderrProgress {
    fn on_start(&self, label: &str, total: usize) {
        eprint!("{label}: 0/{total}");
        let _ = std::io::stderr().flush();
    }

    fn on_ticker(&self, symbol: &str, index: usize, total: usize, _kept: bool) {
        eprint!("\r\x1b[2K{}/{total} {symbol}", index + 1);
        let _ = std::io::stderr().flush();
    }

    fn on_batch_complete(&self, kept: usize, total: usize) {
        eprintln!("\r\x1b[2K{kept}/{total} active");
    }
}

/// Silent progress, for tests and non-interactive runs.
pub struct NoProgress;

impl ClassifyProgress for NoProgress {
    fn on_start(&self, _label: &str, _total: usize) {}
    fn on_ticker(&self, _symbol: &str, _index: usize, _total: usize, _kept: bool) {}
    fn on_batch_complete(&self, _kept: usize, _total: usize) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::QuoteSnapshot;
    use proptest::prelude::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    enum Answer {
        Live(Option<&'static str>),
        NoPrice,
        Miss,
        Down,
    }

    struct MockLookup {
        answers: HashMap<String, Answer>,
        calls: Mutex<Vec<String>>,
    }

    impl MockLookup {
        fn new(answers: Vec<(&str, Answer)>) -> Self {
            Self {
                answers: answers
                    .into_iter()
                    .map(|(s, a)| (s.to_string(), a))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl QuoteLookup for MockLookup {
        fn name(&self) -> &str {
            "mock"
        }

        fn snapshot(&self, symbol: &str) -> Result<QuoteSnapshot, ListingError> {
            self.calls.lock().unwrap().push(symbol.to_string());
            match self.answers.get(symbol) {
                Some(Answer::Live(name)) => Ok(QuoteSnapshot {
                    regular_market_price: Some(100.0),
                    long_name: name.map(String::from),
                    short_name: None,
                }),
                Some(Answer::NoPrice) => Ok(QuoteSnapshot::default()),
                Some(Answer::Down) => Err(ListingError::NetworkUnreachable("timeout".into())),
                Some(Answer::Miss) | None => Err(ListingError::LookupMiss {
                    symbol: symbol.to_string(),
                }),
            }
        }
    }

    fn tickers(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn live_ticker_with_name() {
        let lookup = MockLookup::new(vec![("AAPL", Answer::Live(Some("Apple Inc.")))]);
        let rec = classify(&lookup, "AAPL", true).unwrap().unwrap();
        assert_eq!(rec, ListingRecord::named("AAPL", Some("Apple Inc.".into())));
    }

    #[test]
    fn ticker_only_omits_name() {
        let lookup = MockLookup::new(vec![("AAPL", Answer::Live(Some("Apple Inc.")))]);
        let rec = classify(&lookup, "AAPL", false).unwrap().unwrap();
        assert_eq!(rec, ListingRecord::ticker("AAPL"));
    }

    #[test]
    fn live_ticker_without_long_name_passes_through() {
        let lookup = MockLookup::new(vec![("XYZ", Answer::Live(None))]);
        let rec = classify(&lookup, "XYZ", true).unwrap().unwrap();
        assert_eq!(rec.name, None);
    }

    #[test]
    fn miss_and_missing_price_are_absent() {
        let lookup = MockLookup::new(vec![("OLD", Answer::Miss), ("HALT", Answer::NoPrice)]);
        assert_eq!(classify(&lookup, "OLD", true).unwrap(), None);
        assert_eq!(classify(&lookup, "HALT", false).unwrap(), None);
    }

    #[test]
    fn miss_does_not_shift_following_tickers() {
        let lookup = MockLookup::new(vec![
            ("MSFT", Answer::Live(Some("Microsoft"))),
            ("GONE", Answer::Miss),
            ("AAPL", Answer::Live(Some("Apple"))),
            ("NVDA", Answer::Live(Some("NVIDIA"))),
        ]);
        let records =
            classify_all(&lookup, &tickers(&["MSFT", "GONE", "AAPL", "NVDA"]), false, &NoProgress)
                .unwrap();
        let symbols: Vec<&str> = records.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["MSFT", "AAPL", "NVDA"]);
    }

    #[test]
    fn transport_error_aborts_batch() {
        let lookup = MockLookup::new(vec![
            ("MSFT", Answer::Live(None)),
            ("BOOM", Answer::Down),
            ("AAPL", Answer::Live(None)),
        ]);
        let err = classify_all(&lookup, &tickers(&["MSFT", "BOOM", "AAPL"]), true, &NoProgress)
            .unwrap_err();
        assert!(matches!(err, ListingError::NetworkUnreachable(_)));
        // AAPL is never looked up once the batch aborts.
        assert_eq!(*lookup.calls.lock().unwrap(), vec!["MSFT", "BOOM"]);
    }

    #[test]
    fn one_lookup_per_ticker() {
        let lookup = MockLookup::new(vec![("A", Answer::Live(None))]);
        classify_all(&lookup, &tickers(&["A", "A", "B"]), false, &NoProgress).unwrap();
        assert_eq!(lookup.calls.lock().unwrap().len(), 3);
    }

    proptest! {
        #[test]
        fn kept_records_are_an_ordered_subsequence(
            live in prop::collection::vec(any::<bool>(), 0..40)
        ) {
            let names: Vec<String> = (0..live.len()).map(|i| format!("T{i}")).collect();
            let lookup = MockLookup::new(
                names
                    .iter()
                    .zip(&live)
                    .map(|(n, l)| (n.as_str(), if *l { Answer::Live(None) } else { Answer::Miss }))
                    .collect(),
            );

            let records = classify_all(&lookup, &names, false, &NoProgress).unwrap();
            let expected: Vec<&String> = names
                .iter()
                .zip(&live)
                .filter(|(_, l)| **l)
                .map(|(n, _)| n)
                .collect();

            prop_assert_eq!(records.len(), expected.len());
            for (rec, want) in records.iter().zip(expected) {
                prop_assert_eq!(&rec.symbol, want);
                prop_assert!(rec.name.is_none());
            }
        }
    }
}
