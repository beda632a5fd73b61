use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::{HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use log::{error, info};
use tokio::net::TcpListener;

use crate::{
    audit::AuditLog,
    config::Config,
    db::Repository,
    models::{
        apartment::{Apartment, ApartmentKey},
        search::SearchRequest,
    },
    scrapingbee::Extractor,
    services::search::run_search,
};

pub const SEARCH_DONE: &str = "all done!";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub extractor: Arc<dyn Extractor>,
    pub repository: Arc<dyn Repository>,
    pub audit: Arc<AuditLog>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/searches", get(list_searches))
        .route("/apartments", get(list_apartments))
        .route("/apartments/:address/:apartment_number", get(get_apartment))
        .route("/search", post(search))
        .layer(middleware::from_fn(cors_layer))
        .with_state(state)
}

pub async fn start_http_server(
    state: AppState,
    mut shutdown_rx: tokio::sync::broadcast::Receiver<()>,
) -> Result<()> {
    let bind_addr = state.config.http_bind_address.clone();

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind http listener on {}", bind_addr))?;
    let app = router(state);

    info!("scraper listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await
        .context("HTTP server crashed")
}

async fn cors_layer(req: axum::http::Request<axum::body::Body>, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        let mut response = Response::new(axum::body::Body::empty());
        apply_cors_headers(response.headers_mut());
        *response.status_mut() = StatusCode::NO_CONTENT;
        response
    } else {
        let mut response = next.run(req).await;
        apply_cors_headers(response.headers_mut());
        response
    }
}

fn apply_cors_headers(headers: &mut axum::http::HeaderMap) {
    headers.insert(
        axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        axum::http::header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type"),
    );
    headers.insert(
        axum::http::header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
}

async fn index() -> &'static str {
    "Hello!"
}

async fn list_searches(
    State(state): State<AppState>,
) -> Result<Json<Vec<serde_json::Value>>, StatusCode> {
    state
        .repository
        .all_searches()
        .await
        .map(Json)
        .map_err(|e| {
            error!("GET /searches failed: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

async fn list_apartments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Apartment>>, StatusCode> {
    state
        .repository
        .all_apartments()
        .await
        .map(Json)
        .map_err(|e| {
            error!("GET /apartments failed: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

async fn get_apartment(
    State(state): State<AppState>,
    Path((address, apartment_number)): Path<(String, String)>,
) -> Result<Json<Apartment>, StatusCode> {
    let key = ApartmentKey::from_path(&address, &apartment_number);

    match state.repository.find_apartment(&key).await {
        Ok(Some(apartment)) => Ok(Json(apartment)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Apartment lookup for {:?} failed: {:?}", key, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn search(
    State(state): State<AppState>,
    Json(body): Json<SearchRequest>,
) -> (StatusCode, &'static str) {
    info!("Search request: {:?}", body);

    match run_search(&state, &body).await {
        Ok(_) => (StatusCode::OK, SEARCH_DONE),
        Err(e) => {
            error!("Search failed before any listing was processed: {}", e);
            (StatusCode::BAD_GATEWAY, "search page could not be scraped")
        }
    }
}
