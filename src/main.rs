use std::net::SocketAddr;

use anyhow::Context;
use axum::{Router, response::Html, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_scalar::Scalar;

use clear_sky_solar::api_docs::ApiDoc;
use clear_sky_solar::config::Config;
use clear_sky_solar::routes::sensor_routes::api_routes;
use clear_sky_solar::services::coordinator::ClearSkyCoordinator;
use clear_sky_solar::services::mqtt_service;
use clear_sky_solar::shared_state::{AppState, SharedState, SiteContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 1. Load configuration
    let config_path = Config::default_path();
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load {}", config_path))?;
    let tz = config.site.tz()?;
    let site = config.site.parameters;
    info!(
        path = %config_path,
        latitude = site.latitude,
        longitude = site.longitude,
        elevation_m = site.elevation_m,
        linke_turbidity = site.linke_turbidity,
        timezone = tz.name(),
        "configuration loaded"
    );

    // 2. Initialize shared state and take the first reading before serving
    let state = AppState::new();
    let coordinator = ClearSkyCoordinator::new(site, tz, state.clone());
    coordinator.refresh();

    // 3. Periodic refresh
    let interval = config.update_interval();
    tokio::spawn(coordinator.run(interval));

    // 4. MQTT publisher
    tokio::spawn(mqtt_service::run_publisher(config.mqtt.clone(), state.clone(), interval));

    // 5. HTTP API
    let shared = SharedState {
        app: state,
        site: SiteContext { config: config.site.clone(), tz },
    };
    let app = Router::new()
        .nest("/api", api_routes(shared))
        .route("/scalar", get(|| async { Html(Scalar::new(ApiDoc::openapi()).to_html()) }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("API server listening on http://{}", addr);
    info!("Scalar UI: http://{}/scalar", addr);

    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
        .context("HTTP server failed")?;
    Ok(())
}
