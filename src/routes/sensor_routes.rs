use axum::{Router, routing::{get, post}};

use crate::controllers::sensor_controller::{
    get_clear_sky, get_health, get_sensor, list_sensors, post_calibration,
};
use crate::shared_state::SharedState;

/// Build the `/api/*` sub-router.
/// Handlers extract `State<AppState>` and/or `State<SiteContext>` via
/// `FromRef<SharedState>`, so a single `.with_state(shared)` covers both.
pub fn api_routes(shared: SharedState) -> Router {
    Router::new()
        .route("/sensors",        get(list_sensors))
        .route("/sensors/{key}",  get(get_sensor))
        .route("/clear-sky",      get(get_clear_sky))
        .route("/calibration",    post(post_calibration))
        .route("/health",         get(get_health))
        .with_state(shared)
}
