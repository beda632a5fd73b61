use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use log::{error, info};
use tokio::sync::Semaphore;

use crate::{
    models::{
        apartment::NormalizedApartment,
        search::{SearchRequest, SearchResult},
    },
    scrapingbee::{decode, ScrapeError},
    streeteasy::{
        listing::{listing_rules, normalize, RawListingPage},
        search::aggregate,
    },
    web::AppState,
};

/// Runs one full search.
///
/// 1) Scrapes the results page and ranks the organic listings
/// 2) Scrapes, normalizes, audits and stores every listing
/// 3) Writes the summary to the audit log
///
/// Only a failure of the results page itself is returned; individual
/// listings that fail are logged and left out of the rent total.
pub async fn run_search(
    state: &AppState,
    request: &SearchRequest,
) -> Result<SearchResult, ScrapeError> {
    let summary = aggregate(state.extractor.as_ref(), &state.config, request).await?;

    let prices = process_listings(state, &summary.apartments).await;

    let result = SearchResult {
        highest_rank: summary.highest_rank,
        average_rent: average_rent(&prices, summary.apartments.len()),
        apartments: summary.apartments,
        created_at: Utc::now(),
    };

    if let Err(e) = state.audit.append(&result).await {
        error!("Failed to write search summary to audit log: {:?}", e);
    }

    info!("Finished search: {:?}", result);
    Ok(result)
}

/// Processes every listing with at most `listing_concurrency` in flight and
/// returns the price of each one that succeeded, in listing order.
async fn process_listings(state: &AppState, urls: &[String]) -> Vec<Option<i64>> {
    let sem = Arc::new(Semaphore::new(state.config.listing_concurrency.max(1) as usize));

    let mut listing_handles = Vec::new();
    for url in urls {
        let permit = Arc::clone(&sem).acquire_owned().await;

        let state_clone = state.clone();
        let url_clone = url.clone();

        let handle = tokio::task::spawn(async move {
            let _permit = permit;
            process_listing(&state_clone, &url_clone).await
        });

        listing_handles.push((url, handle));
    }

    let (urls, handles): (Vec<_>, Vec<_>) = listing_handles.into_iter().unzip();
    let results = join_all(handles).await;

    let mut prices = Vec::new();
    for (url, result) in urls.into_iter().zip(results) {
        match result {
            Ok(Ok(apartment)) => prices.push(apartment.price),
            Ok(Err(e)) => error!("Failed to process listing {}: {}", url, e),
            Err(e) => error!("Listing task for {} panicked: {:?}", url, e),
        }
    }
    prices
}

/// Scrapes and normalizes one listing, then records it.
///
/// Audit and storage failures are logged; the normalized record is returned
/// either way.
pub async fn process_listing(
    state: &AppState,
    url: &str,
) -> Result<NormalizedApartment, ScrapeError> {
    let body = state.extractor.fetch(url, &listing_rules()).await?;
    let page: RawListingPage = decode(&body)?;
    let apartment = normalize(&page);

    if let Err(e) = state.audit.append(&apartment).await {
        error!("Failed to write apartment to audit log: {:?}", e);
    }

    match state.repository.insert_apartment(&apartment).await {
        Ok(stored) => info!("Stored apartment: {:?}", stored),
        Err(e) => error!("Failed to store apartment from {}: {:?}", url, e),
    }

    Ok(apartment)
}

/// `round(total / listing_count + 1)`.
///
/// `None` when there were no listings or any processed listing had no
/// readable price.
pub fn average_rent(prices: &[Option<i64>], listing_count: usize) -> Option<i64> {
    if listing_count == 0 {
        return None;
    }

    let total = prices
        .iter()
        .try_fold(0.0, |total, price| price.map(|price| total + price as f64))?;
    Some((total / listing_count as f64 + 1.0).round() as i64)
}
