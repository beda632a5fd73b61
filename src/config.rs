use dotenvy::dotenv;
use log::error;
use serde::Deserialize;
use std::env;

const CONFIG_PATH_ENV: &str = "CONFIG_PATH";
const DB_USERNAME_ENV: &str = "DB_USERNAME";
const DB_PASSWORD_ENV: &str = "DB_PASSWORD";
const SCRAPINGBEE_API_KEY_ENV: &str = "SCRAPINGBEE_API_KEY";

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub http_bind_address: String,
    pub db_host: String,
    pub db_port: u16,
    pub db_name: String,
    pub db_pool_size: u32,
    pub scrapingbee_url: String,
    pub scrape_timeout_seconds: Option<u64>,
    pub search_base_url: String,
    pub featured_listing_count: usize,
    pub preferred_operator_marker: String,
    pub listing_concurrency: u32,
    pub audit_log_path: String,

    // Secrets, filled from the environment after the file is parsed
    #[serde(skip)]
    pub db_username: String,
    #[serde(skip)]
    pub db_password: Option<String>,
    #[serde(skip)]
    pub scrapingbee_api_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            http_bind_address: "0.0.0.0:3000".to_string(),
            db_host: "localhost".to_string(),
            db_port: 5432,
            db_name: "Scraper_POC".to_string(),
            db_pool_size: 10,
            scrapingbee_url: "https://app.scrapingbee.com/api/v1/".to_string(),
            scrape_timeout_seconds: None,
            search_base_url: "https://streeteasy.com".to_string(),
            featured_listing_count: 2,
            preferred_operator_marker: "Silverstein".to_string(),
            listing_concurrency: 1,
            audit_log_path: "database.txt".to_string(),
            db_username: String::new(),
            db_password: None,
            scrapingbee_api_key: String::new(),
        }
    }
}

impl Config {
    pub fn database_url(&self) -> String {
        match &self.db_password {
            Some(password) => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.db_username, password, self.db_host, self.db_port, self.db_name
            ),
            None => format!(
                "postgres://{}@{}:{}/{}",
                self.db_username, self.db_host, self.db_port, self.db_name
            ),
        }
    }

    fn apply_env(mut self) -> Config {
        if let Ok(username) = env::var(DB_USERNAME_ENV) {
            self.db_username = username;
        }
        self.db_password = env::var(DB_PASSWORD_ENV).ok();
        self.scrapingbee_api_key = env::var(SCRAPINGBEE_API_KEY_ENV).unwrap_or_default();
        self
    }
}

pub fn create_test_config() -> Config {
    Config {
        http_bind_address: "127.0.0.1:0".to_string(),
        db_username: "xxx".to_string(),
        db_password: Some("xxx".to_string()),
        scrapingbee_api_key: "xxx".to_string(),
        audit_log_path: "/tmp/rentscout-test-audit.txt".to_string(),
        ..Config::default()
    }
}

pub fn parse_config(bytes: &[u8]) -> Result<Config, String> {
    toml::from_slice(bytes).map_err(|e| e.to_string())
}

pub fn read_config() -> Config {
    dotenv().ok();
    env::var(CONFIG_PATH_ENV)
        .map_err(|_| format!("{CONFIG_PATH_ENV} .env not set"))
        .and_then(|config_path| std::fs::read(config_path).map_err(|e| e.to_string()))
        .and_then(|bytes| parse_config(&bytes))
        .map(Config::apply_env)
        .unwrap_or_else(|err| {
            error!("failed to read config: {err}");
            std::process::exit(1);
        })
}
