use serde::Deserialize;

use crate::models::apartment::NormalizedApartment;
use crate::scrapingbee::{ExtractRules, Rule};

use super::helpers::{fact_count, find_fact, parse_digits};

pub fn listing_rules() -> ExtractRules {
    ExtractRules::new()
        .field("title", Rule::css(".building-title"))
        .field("price", Rule::item(".price ", Some("text")))
        .field("popularity", Rule::item(".popularity", Some("text")))
        .field("description", Rule::css("#full-content"))
        .field("no_fee", Rule::css(".NoFeeBadge"))
        .field(
            "price_history",
            Rule::list(".Table-cell--priceHistory", Some("text")),
        )
        .field(
            "listing_company",
            Rule::item(".ListingAgents-agentName", Some("text")),
        )
        .field("days_on_mkt", Rule::list(".Vitals-data", Some("text")))
        .field("amenities", Rule::css(".AmenitiesBlock"))
        .field("vitalInfo", Rule::list(".detail_cell", Some("text")))
}

/// Field bundle extracted from one listing page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawListingPage {
    pub title: Option<String>,
    pub price: Option<String>,
    pub popularity: Option<String>,
    pub description: Option<String>,
    pub no_fee: Option<String>,
    pub price_history: Option<Vec<String>>,
    pub listing_company: Option<String>,
    pub days_on_mkt: Option<Vec<String>>,
    pub amenities: Option<String>,
    #[serde(rename = "vitalInfo")]
    pub vital_info: Option<Vec<String>>,
}

/// Maps a raw listing bundle onto the persisted record.
///
/// Never fails: anything missing from the page ends up as `None` or an
/// empty string.
pub fn normalize(page: &RawListingPage) -> NormalizedApartment {
    let title = page.title.as_deref().unwrap_or_default();
    let mut title_parts = title.split('#');
    let address = title_parts.next().unwrap_or_default().trim().to_string();
    let apartment_number = title_parts.next().map(String::from);

    let facts: &[String] = page.vital_info.as_deref().unwrap_or_default();

    NormalizedApartment {
        address,
        apartment_number,
        price: page.price.as_deref().and_then(parse_digits),
        no_fee: page.no_fee.as_deref().is_some_and(|badge| !badge.is_empty()),
        listing_company: page.listing_company.clone(),
        days_on_market: page
            .days_on_mkt
            .as_ref()
            .and_then(|vitals| vitals.get(1))
            .cloned(),
        popularity: page.popularity.as_deref().and_then(parse_digits),
        description: page.description.clone().unwrap_or_default(),
        bedrooms: fact_count(facts, "bed"),
        bathrooms: fact_count(facts, "bath"),
        sq_ft: find_fact(facts, "ft").map(String::from),
    }
}
