// tests/dates_normalize.rs
use review_sentiment_api::dates::{normalize, UNKNOWN_DATE};

#[test]
fn embedded_sentence_is_extracted() {
    assert_eq!(
        normalize("Reviewed in the United States on 5 August 2025"),
        "2025-08-05"
    );
    assert_eq!(
        normalize("Reviewed in the United Kingdom on 05 Aug 2025"),
        "2025-08-05"
    );
}

#[test]
fn us_style_with_and_without_prefix() {
    assert_eq!(normalize("August 5, 2025"), "2025-08-05");
    assert_eq!(
        normalize("Reviewed in the United States on December 31, 2024"),
        "2024-12-31"
    );
}

#[test]
fn month_names_are_case_insensitive() {
    assert_eq!(normalize("5 AUGUST 2025"), "2025-08-05");
    assert_eq!(normalize("august 5, 2025"), "2025-08-05");
}

#[test]
fn empty_and_whitespace() {
    assert_eq!(normalize(""), UNKNOWN_DATE);
    assert_eq!(normalize(" \n "), UNKNOWN_DATE);
}

#[test]
fn iso_variants() {
    assert_eq!(normalize("2025-08-05"), "2025-08-05");
    assert_eq!(normalize("2025-08-05T10:00:00.123456"), "2025-08-05");
    assert_eq!(normalize("2025-08-05T10:00:00Z"), "2025-08-05");
    assert_eq!(normalize("20250805"), "2025-08-05");
}

#[test]
fn unparseable_is_its_own_bucket() {
    assert_eq!(normalize("garbage-no-date"), "garbage-no-date");
    assert_eq!(normalize("05/08/2025"), "05/08/2025");
    assert_ne!(normalize("a week ago"), normalize("2 weeks ago"));
    assert_eq!(normalize("a week ago"), normalize("a week ago"));
}
