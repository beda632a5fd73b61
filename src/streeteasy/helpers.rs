use lazy_static::lazy_static;
use regex::Regex;

use crate::models::search::SearchRequest;

lazy_static! {
    static ref NON_DIGIT_REGEX: Regex = Regex::new(r"\D").unwrap();
}

pub fn create_search_url(base_url: &str, request: &SearchRequest) -> String {
    format!(
        "{}/{}-bedroom-apartments-for-rent/{}/price:{}-{}",
        base_url.trim_end_matches('/'),
        request.bedrooms,
        request.location,
        request.min_price,
        request.max_price
    )
}

/// Drops every non-digit and parses what is left, `"$3,450/mo"` -> 3450.
pub fn parse_digits(text: &str) -> Option<i64> {
    NON_DIGIT_REGEX.replace_all(text, "").parse().ok()
}

/// First fact containing `needle`.
pub fn find_fact<'a>(facts: &'a [String], needle: &str) -> Option<&'a str> {
    facts
        .iter()
        .find(|fact| fact.contains(needle))
        .map(String::as_str)
}

/// Leading token of the first fact containing `needle`, `"2 bed"` -> `"2"`.
///
/// Surrounding whitespace is ignored, so `" 2 bed"` also gives `"2"`.
pub fn fact_count(facts: &[String], needle: &str) -> Option<String> {
    find_fact(facts, needle)
        .and_then(|fact| fact.split_whitespace().next())
        .map(String::from)
}
