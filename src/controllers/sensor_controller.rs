use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::debug;

use crate::models::api::{
    CalibrationRequest, CalibrationResponse, ClearSkyQuery, ClearSkyResponse, ErrorResponse,
    HealthStatus, parse_instant,
};
use crate::models::sensor::{SENSOR_DESCRIPTIONS, SensorState, find_description};
use crate::services::calibration::estimate_site_scale_factor;
use crate::services::clear_sky::compute_clear_sky;
use crate::services::solar_geometry::day_of_year;
use crate::shared_state::{AppState, SiteContext};

fn error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, Json(ErrorResponse { error: message.into() })).into_response()
}

/// GET /api/sensors
/// List the clear-sky sensors
///
/// Returns GHI, DNI and DHI with their metadata and latest value. Values are
/// `null` until the coordinator has completed its first refresh.
#[utoipa::path(
    get,
    path = "/api/sensors",
    responses(
        (status = 200, description = "All sensors", body = Vec<SensorState>)
    )
)]
pub async fn list_sensors(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.get_snapshot();
    let sensors: Vec<SensorState> = SENSOR_DESCRIPTIONS
        .iter()
        .map(|d| SensorState::from_snapshot(d, snapshot.as_ref()))
        .collect();
    Json(sensors)
}

/// GET /api/sensors/{key}
/// Get one sensor by key (`ghi`, `dni` or `dhi`)
#[utoipa::path(
    get,
    path = "/api/sensors/{key}",
    params(
        ("key" = String, Path, description = "Sensor key")
    ),
    responses(
        (status = 200, description = "Sensor state", body = SensorState),
        (status = 404, description = "Unknown sensor", body = ErrorResponse)
    )
)]
pub async fn get_sensor(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> axum::response::Response {
    match find_description(&key) {
        Some(desc) => {
            let snapshot = state.get_snapshot();
            Json(SensorState::from_snapshot(desc, snapshot.as_ref())).into_response()
        }
        None => error(StatusCode::NOT_FOUND, format!("unknown sensor '{}'", key)),
    }
}

/// GET /api/clear-sky
/// Evaluate the clear-sky model on demand
///
/// Any omitted site field falls back to the configured site. The day of year
/// is taken in the configured timezone.
#[utoipa::path(
    get,
    path = "/api/clear-sky",
    params(ClearSkyQuery),
    responses(
        (status = 200, description = "Clear-sky irradiance", body = ClearSkyResponse),
        (status = 400, description = "Unparseable time", body = ErrorResponse)
    )
)]
pub async fn get_clear_sky(
    Query(query): Query<ClearSkyQuery>,
    State(site): State<SiteContext>,
) -> axum::response::Response {
    let instant = match query.time.as_deref() {
        Some(raw) => match parse_instant(raw) {
            Some(t) => t,
            None => return error(StatusCode::BAD_REQUEST, format!("invalid time '{}'", raw)),
        },
        None => Utc::now(),
    };

    let params = query.site(&site.config.parameters);
    let local = instant.with_timezone(&site.tz);
    let irradiance = compute_clear_sky(&params, &local);
    debug!(latitude = params.latitude, longitude = params.longitude, at = %local, "on-demand evaluation");

    Json(ClearSkyResponse {
        site: params,
        local_time: local.to_rfc3339(),
        day_of_year: day_of_year(&local),
        irradiance,
    })
    .into_response()
}

/// POST /api/calibration
/// Estimate a site scale factor from observed vs modeled GHI
///
/// Returns the median observed/modeled ratio over samples whose solar
/// elevation lies inside the window (default 10°–60°), or 1.0 if none do.
#[utoipa::path(
    post,
    path = "/api/calibration",
    request_body = CalibrationRequest,
    responses(
        (status = 200, description = "Scale factor", body = CalibrationResponse),
        (status = 422, description = "Sequences differ in length", body = ErrorResponse)
    )
)]
pub async fn post_calibration(Json(req): Json<CalibrationRequest>) -> axum::response::Response {
    match estimate_site_scale_factor(&req.observed, &req.modeled, &req.elevations, req.window) {
        Ok(scale_factor) => Json(CalibrationResponse { scale_factor }).into_response(),
        Err(e) => error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
    }
}

/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service health", body = HealthStatus)
    )
)]
pub async fn get_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthStatus {
        status: "OK".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        last_update: state.get_snapshot().map(|s| s.updated_at),
        mqtt_connected: state.is_mqtt_connected(),
    })
}
