#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the incident dashboard.
//!
//! The dataset is loaded once at startup and shared read-only by every
//! request. Each request builds its own filter criteria from the query
//! string, filters the shared records into a new selection, and returns
//! the aggregated views, a page of the detail table, or a CSV export of
//! that selection.

mod handlers;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use incident_dashboard_analytics::filter::filter_options;
use incident_dashboard_analytics_models::FilterOptions;
use incident_dashboard_dataset::cache::DatasetCache;
use incident_dashboard_dataset::{Dataset, LoadError};
use thiserror::Error;

/// Default location of the dataset file.
pub const DEFAULT_DATA_PATH: &str = "data/india_terrorism_database_with_summary.csv";

/// Errors that can stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The dataset could not be loaded.
    #[error("Failed to load dataset: {0}")]
    Load(#[from] LoadError),

    /// The HTTP server failed to bind or run.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Server settings, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Dataset file (`DATA_PATH`).
    pub data_path: PathBuf,
    /// Bind address (`BIND_ADDR`).
    pub bind_addr: String,
    /// Listen port (`PORT`).
    pub port: u16,
}

impl ServerConfig {
    /// Reads `DATA_PATH`, `BIND_ADDR` and `PORT`, falling back to defaults
    /// for unset or unparseable values.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            data_path: lookup("DATA_PATH")
                .map_or_else(|| PathBuf::from(DEFAULT_DATA_PATH), PathBuf::from),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT").and_then(|p| p.parse().ok()).unwrap_or(8080),
        }
    }
}

/// Shared application state.
///
/// Requests read the dataset through the load-once cache, so every request
/// sees the same shared records without re-reading the source.
pub struct AppState {
    data_path: PathBuf,
    cache: Mutex<DatasetCache>,
    /// Filter choices derived from the full dataset.
    pub options: FilterOptions,
}

impl AppState {
    /// Loads the dataset at `data_path` into a fresh cache.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the dataset cannot be loaded.
    pub fn load(data_path: PathBuf) -> Result<Self, LoadError> {
        let mut cache = DatasetCache::new();
        let dataset = cache.get_or_load(&data_path)?;
        let options = filter_options(dataset.incidents());

        Ok(Self {
            data_path,
            cache: Mutex::new(cache),
            options,
        })
    }

    /// The cached dataset.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the source can no longer be resolved.
    pub fn dataset(&self) -> Result<Arc<Dataset>, LoadError> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_load(&self.data_path)
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/options", web::get().to(handlers::options))
            .route("/dashboard", web::get().to(handlers::dashboard))
            .route("/incidents", web::get().to(handlers::incidents))
            .route("/export", web::get().to(handlers::export)),
    );
}

/// Loads the dataset and starts the HTTP server.
///
/// This is a regular async function; the caller provides the runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns [`ServerError::Load`] if the dataset cannot be loaded, which
/// aborts startup, or [`ServerError::Io`] if the server fails to bind or
/// run.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    log::info!("Loading dataset from {}...", config.data_path.display());
    let state = web::Data::new(AppState::load(config.data_path).inspect_err(|e| {
        log::error!("{e}");
    })?);
    log::info!(
        "Serving {} states and {} attack types",
        state.options.states.len(),
        state.options.attack_types.len()
    );

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await?;

    Ok(())
}
