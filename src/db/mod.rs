pub mod apartment;
pub mod schema;
pub mod search;

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use diesel::{
    r2d2::{ConnectionManager, Pool, PooledConnection},
    PgConnection,
};

use crate::config::Config;
use crate::models::apartment::{Apartment, ApartmentKey, NormalizedApartment};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
type DbConnection = PooledConnection<ConnectionManager<PgConnection>>;

/// Builds the shared pool without touching the database; connections are
/// opened lazily on first use.
pub fn create_pool(config: &Config) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(config.database_url());

    Pool::builder()
        .max_size(config.db_pool_size)
        .min_idle(Some(0))
        .connection_timeout(Duration::from_secs(5))
        .build_unchecked(manager)
}

/// Storage behind the HTTP handlers and the search pipeline.
#[async_trait]
pub trait Repository: Send + Sync {
    async fn all_searches(&self) -> Result<Vec<serde_json::Value>>;
    async fn all_apartments(&self) -> Result<Vec<Apartment>>;
    async fn find_apartment(&self, key: &ApartmentKey) -> Result<Option<Apartment>>;
    async fn insert_apartment(&self, apartment: &NormalizedApartment) -> Result<Apartment>;
}

#[derive(Clone)]
pub struct PgRepository {
    pool: DbPool,
}

impl PgRepository {
    pub fn new(pool: DbPool) -> PgRepository {
        PgRepository { pool }
    }

    // Diesel is blocking, keep it off the async workers
    async fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut DbConnection) -> Result<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().context("Failed to get a database connection")?;
            f(&mut conn)
        })
        .await
        .context("Database task panicked")?
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn all_searches(&self) -> Result<Vec<serde_json::Value>> {
        self.with_connection(|conn| search::get_all(conn).context("Failed to load searches"))
            .await
    }

    async fn all_apartments(&self) -> Result<Vec<Apartment>> {
        self.with_connection(|conn| apartment::get_all(conn).context("Failed to load apartments"))
            .await
    }

    async fn find_apartment(&self, key: &ApartmentKey) -> Result<Option<Apartment>> {
        let key = key.clone();
        self.with_connection(move |conn| {
            apartment::find_by_key(conn, &key).context("Failed to look up apartment")
        })
        .await
    }

    async fn insert_apartment(&self, normalized: &NormalizedApartment) -> Result<Apartment> {
        let normalized = normalized.clone();
        self.with_connection(move |conn| {
            apartment::insert(conn, &normalized).context("Failed to insert apartment")
        })
        .await
    }
}
