// tests/store_concurrency.rs
//
// Concurrent writers and readers on one shared store: batches land whole, nothing is lost.

use std::sync::Arc;
use std::thread;

use review_sentiment_api::aggregate::time_series;
use review_sentiment_api::{ReviewRecord, ReviewStore, SentimentLabel};

const BATCH: usize = 5;
const WRITERS: usize = 4;
const BATCHES_PER_WRITER: usize = 50;

fn batch(writer: usize) -> Vec<ReviewRecord> {
    (0..BATCH)
        .map(|i| ReviewRecord {
            sentiment: SentimentLabel::Positive,
            confidence: 0.5,
            text: format!("w{writer} r{i}"),
            date: Some(format!("{} March 2025", i + 1)),
            country: Some("US".into()),
        })
        .collect()
}

#[test]
fn readers_never_see_partial_batches() {
    let store = Arc::new(ReviewStore::new());
    store.ingest("B0TESTXX01", "shared", Vec::new()).unwrap();

    let writers: Vec<_> = (0..WRITERS)
        .map(|w| {
            let s = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..BATCHES_PER_WRITER {
                    s.ingest("B0TESTXX01", "", batch(w)).unwrap();
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..2)
        .map(|_| {
            let s = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..200 {
                    let n = s
                        .with_entry("B0TESTXX01", |e| {
                            let ts = time_series(&e.results);
                            assert_eq!(ts.columns.total(), e.results.len());
                            e.results.len()
                        })
                        .unwrap();
                    assert_eq!(n % BATCH, 0, "observed a partial batch: {n}");
                }
            })
        })
        .collect();

    for h in writers.into_iter().chain(readers) {
        h.join().expect("thread panicked");
    }

    let entry = store.get("B0TESTXX01").unwrap();
    assert_eq!(entry.results.len(), WRITERS * BATCHES_PER_WRITER * BATCH);
    assert_eq!(entry.title, "shared");
}
