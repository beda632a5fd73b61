pub mod client;
pub mod error;
pub mod rules;

pub use client::{decode, Extractor, ScrapingBeeClient};
pub use error::{Result, ScrapeError};
pub use rules::{ExtractRules, Rule, RuleKind};
