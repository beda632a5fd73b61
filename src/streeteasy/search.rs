use log::info;
use serde::Deserialize;

use crate::config::Config;
use crate::models::search::SearchRequest;
use crate::scrapingbee::{decode, ExtractRules, Extractor, Rule, ScrapeError};

use super::helpers::create_search_url;

pub fn search_rules() -> ExtractRules {
    ExtractRules::new()
        .field("links", Rule::list("a.listingCard-globalLink", Some("@href")))
        .field("addresses", Rule::list(".listingCard-link", Some("text")))
        .field("listed_by", Rule::list(".listingCardBottom--finePrint", None))
        .wait_for(".jsGlobalListingCardLink")
}

/// Parallel lists scraped from a results page, one entry per listing card.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingsPage {
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub addresses: Vec<String>,
    #[serde(default)]
    pub listed_by: Vec<String>,
}

impl ListingsPage {
    /// Removes the first `count` cards, which are paid placements.
    pub fn without_featured(mut self, count: usize) -> ListingsPage {
        for list in [&mut self.links, &mut self.addresses, &mut self.listed_by] {
            list.drain(..count.min(list.len()));
        }
        self
    }
}

/// Organic listings of one results page and the rank of the preferred operator.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSummary {
    pub highest_rank: u32,
    pub apartments: Vec<String>,
}

/// 1-based position of the first listing whose "listed by" line contains
/// `marker`, 0 when none does.
pub fn highest_rank(listed_by: &[String], marker: &str) -> u32 {
    listed_by
        .iter()
        .position(|company| company.contains(marker))
        .map_or(0, |index| index as u32 + 1)
}

pub fn summarize(page: ListingsPage, featured_count: usize, marker: &str) -> ListingSummary {
    let page = page.without_featured(featured_count);
    let ranked = page.links.len().min(page.listed_by.len());

    ListingSummary {
        highest_rank: highest_rank(&page.listed_by[..ranked], marker),
        apartments: page.links,
    }
}

/// Scrapes the results page for `request` and ranks its organic listings.
pub async fn aggregate(
    extractor: &dyn Extractor,
    config: &Config,
    request: &SearchRequest,
) -> Result<ListingSummary, ScrapeError> {
    let url = create_search_url(&config.search_base_url, request);
    let body = extractor.fetch(&url, &search_rules()).await?;
    let page: ListingsPage = decode(&body)?;

    info!(
        "Results page {} returned {} link(s) and {} listing companies",
        url,
        page.links.len(),
        page.listed_by.len()
    );

    Ok(summarize(
        page,
        config.featured_listing_count,
        &config.preferred_operator_marker,
    ))
}
