//! Demo that ingests a few classified reviews into a fresh store and prints every view as JSON.

use review_sentiment_api::query::{self, IngestRequest};
use review_sentiment_api::{ReviewRecord, ReviewStore, SentimentLabel};

fn review(label: SentimentLabel, date: &str, country: &str, text: &str) -> ReviewRecord {
    ReviewRecord {
        sentiment: label,
        confidence: 0.72,
        text: text.into(),
        date: Some(date.into()),
        country: Some(country.into()),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();
    let store = ReviewStore::new();

    let batch = IngestRequest {
        asin: "b0demo0001".into(),
        title: "Demo Kettle".into(),
        results: vec![
            review(
                SentimentLabel::Positive,
                "Reviewed in the United Kingdom on 5 August 2025",
                "the United Kingdom",
                "Boils fast, looks great.",
            ),
            review(
                SentimentLabel::Negative,
                "Reviewed in the United States on August 6, 2025",
                "the United States",
                "Lid broke after a week.",
            ),
            review(
                SentimentLabel::Neutral,
                "3 weeks ago",
                "the United States",
                "It is a kettle.",
            ),
        ],
    };
    let ack = query::ingest(&store, batch)?;
    println!("ingest: {}", serde_json::to_string(&ack)?);

    println!(
        "products: {}",
        serde_json::to_string_pretty(&query::list_products(&store))?
    );
    println!(
        "timeseries: {}",
        serde_json::to_string_pretty(&query::get_time_series(&store, "B0DEMO0001")?)?
    );
    println!(
        "countries: {}",
        serde_json::to_string_pretty(&query::get_country_breakdown(&store, "B0DEMO0001")?)?
    );
    Ok(())
}
