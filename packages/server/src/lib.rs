#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the age map dashboard.
//!
//! Re-serves the two upstream datasets unchanged and exposes the dashboard
//! views on top of them: styled map features, the filtered chart series,
//! selectable districts, legends, and the zone table. Every request builds
//! its own [`DashboardState`](age_map_engine::dashboard::DashboardState)
//! from query parameters; the loaded data is shared read-only.

mod handlers;
pub mod interactive;
pub mod query;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use age_map_engine::dashboard::DashboardConfig;
use age_map_population_models::DashboardData;
use age_map_source::DataSourceConfig;

/// Shared application state.
pub struct AppState {
    /// Datasets loaded at startup. Either may be absent.
    pub data: Arc<DashboardData>,
    /// Zone table, palette, and density ramp.
    pub config: Arc<DashboardConfig>,
}

/// Where the server listens and what it loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
    /// Dataset locations.
    pub sources: DataSourceConfig,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            sources: DataSourceConfig::default(),
        }
    }
}

impl ServerSettings {
    /// Reads `BIND_ADDR` and `PORT` plus the dataset variables understood by
    /// [`DataSourceConfig::from_env`].
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr);
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        Self {
            bind_addr,
            port,
            sources: DataSourceConfig::from_env(),
        }
    }
}

/// Registers every route on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/hex-population",
        web::get().to(handlers::hex_population),
    )
    .route(
        "/district-population-chart",
        web::get().to(handlers::district_population_chart),
    )
    .service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/map", web::get().to(handlers::map))
            .route("/chart", web::get().to(handlers::chart))
            .route("/districts", web::get().to(handlers::districts))
            .route("/legend", web::get().to(handlers::legend))
            .route("/summary", web::get().to(handlers::summary))
            .route("/zones", web::get().to(handlers::zones)),
    );
}

/// Starts the age map API server.
///
/// Loads both datasets, then starts the Actix-Web HTTP server. A dataset
/// that fails to load is served as empty. The caller provides the async
/// runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(settings: ServerSettings) -> std::io::Result<()> {
    log::info!("Loading datasets...");
    let client = reqwest::Client::new();
    let data = age_map_source::load_dashboard_data(&client, &settings.sources).await;

    let state = web::Data::new(AppState {
        data: Arc::new(data),
        config: Arc::new(DashboardConfig::default()),
    });

    let ServerSettings {
        bind_addr, port, ..
    } = settings;
    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
