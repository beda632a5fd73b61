#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rentscout::{
    audit::AuditLog,
    config::{create_test_config, Config},
    db::Repository,
    models::apartment::{Apartment, ApartmentKey, NormalizedApartment},
    scrapingbee::{ExtractRules, Extractor, ScrapeError},
    web::AppState,
};
use serde_json::{json, Value};
use tempfile::TempDir;

pub const SEARCH_URL: &str =
    "https://streeteasy.com/2-bedroom-apartments-for-rent/chelsea/price:1000-5000";

/// Serves canned extraction responses keyed by target url.
#[derive(Default)]
pub struct FakeExtractor {
    pages: HashMap<String, Value>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeExtractor {
    pub fn with_page(mut self, url: &str, body: Value) -> FakeExtractor {
        self.pages.insert(url.to_string(), body);
        self
    }

    pub fn called(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Extractor for FakeExtractor {
    async fn fetch(&self, url: &str, _rules: &ExtractRules) -> rentscout::scrapingbee::Result<Vec<u8>> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(body) => Ok(serde_json::to_vec(body).unwrap()),
            None => Err(ScrapeError::Api {
                status: 500,
                message: format!("no page for {url}"),
            }),
        }
    }
}

/// Repository kept in memory; `failing` makes every call error out.
#[derive(Default)]
pub struct MemoryRepository {
    pub apartments: Mutex<Vec<Apartment>>,
    pub searches: Vec<Value>,
    pub failing: bool,
}

impl MemoryRepository {
    pub fn failing() -> MemoryRepository {
        MemoryRepository {
            failing: true,
            ..MemoryRepository::default()
        }
    }

    pub fn stored(&self) -> Vec<Apartment> {
        self.apartments.lock().unwrap().clone()
    }

    fn check(&self) -> Result<()> {
        if self.failing {
            return Err(anyhow!("connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn all_searches(&self) -> Result<Vec<Value>> {
        self.check()?;
        Ok(self.searches.clone())
    }

    async fn all_apartments(&self) -> Result<Vec<Apartment>> {
        self.check()?;
        Ok(self.stored())
    }

    async fn find_apartment(&self, key: &ApartmentKey) -> Result<Option<Apartment>> {
        self.check()?;
        Ok(self.stored().into_iter().find(|a| key_matches(key, a)))
    }

    async fn insert_apartment(&self, apartment: &NormalizedApartment) -> Result<Apartment> {
        self.check()?;
        let mut apartments = self.apartments.lock().unwrap();
        let stored = Apartment {
            id: apartments.len() as i32 + 1,
            address: Some(apartment.address.clone()),
            apartment_number: apartment.apartment_number.clone(),
            bedrooms: apartment.bedrooms.clone(),
            bathrooms: apartment.bathrooms.clone(),
            square_feet: apartment.sq_ft.clone(),
            description: Some(apartment.description.clone()),
            listing_company: apartment.listing_company.clone(),
            no_fee: Some(apartment.no_fee),
        };
        apartments.push(stored.clone());
        Ok(stored)
    }
}

// Mirrors the `lower(address) = $1 AND apartment_number = $2` lookup
pub fn key_matches(key: &ApartmentKey, apartment: &Apartment) -> bool {
    let address_matches = apartment
        .address
        .as_deref()
        .is_some_and(|address| address.to_lowercase() == key.address);

    address_matches && apartment.apartment_number.as_deref() == Some(key.apartment_number.as_str())
}

pub struct TestApp {
    pub state: AppState,
    pub extractor: Arc<FakeExtractor>,
    pub repository: Arc<MemoryRepository>,
    // Keeps the audit directory alive for the duration of the test
    pub audit_dir: TempDir,
}

impl TestApp {
    pub fn new(extractor: FakeExtractor, repository: MemoryRepository) -> TestApp {
        TestApp::with_config(create_test_config(), extractor, repository)
    }

    pub fn with_config(
        config: Config,
        extractor: FakeExtractor,
        repository: MemoryRepository,
    ) -> TestApp {
        let audit_dir = tempfile::tempdir().unwrap();
        let extractor = Arc::new(extractor);
        let repository = Arc::new(repository);

        let state = AppState {
            config: Arc::new(config),
            extractor: extractor.clone(),
            repository: repository.clone(),
            audit: Arc::new(AuditLog::new(audit_dir.path().join("database.txt"))),
        };

        TestApp {
            state,
            extractor,
            repository,
            audit_dir,
        }
    }

    pub fn audit_records(&self) -> Vec<Value> {
        std::fs::read_to_string(self.state.audit.path())
            .unwrap_or_default()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

pub fn listing_url(n: usize) -> String {
    format!("https://streeteasy.com/building/listing-{n}")
}

pub fn results_page(listings: &[(String, &str)]) -> Value {
    let mut links = vec!["https://streeteasy.com/featured-1", "https://streeteasy.com/featured-2"]
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>();
    let mut listed_by = vec![
        "Listing by Silverstein Properties".to_string(),
        "Listing by Featured Realty".to_string(),
    ];

    for (url, company) in listings {
        links.push(url.clone());
        listed_by.push(company.to_string());
    }

    json!({ "links": links, "addresses": [], "listed_by": listed_by })
}

pub fn listing_page(title: &str, price: &str) -> Value {
    json!({
        "title": title,
        "price": price,
        "popularity": "14 people saved",
        "description": "Bright unit",
        "no_fee": "NO FEE",
        "price_history": [],
        "listing_company": "Listing by Acme",
        "days_on_mkt": ["Available now", "5 days"],
        "amenities": "",
        "vitalInfo": ["2 beds", "1 bath", "750 ft²"]
    })
}
