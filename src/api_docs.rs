use utoipa::OpenApi;

use crate::controllers::sensor_controller;
use crate::models::{api, irradiance, sensor};
use crate::services::calibration;

#[derive(OpenApi)]
#[openapi(
    paths(
        sensor_controller::list_sensors,
        sensor_controller::get_sensor,
        sensor_controller::get_clear_sky,
        sensor_controller::post_calibration,
        sensor_controller::get_health
    ),
    components(
        schemas(
            sensor::SensorState,
            sensor::SensorDescription,
            irradiance::ClearSkyResult,
            irradiance::SiteParameters,
            calibration::CalibrationWindow,
            api::ClearSkyResponse,
            api::CalibrationRequest,
            api::CalibrationResponse,
            api::HealthStatus,
            api::ErrorResponse
        )
    ),
    tags(
        (name = "clear-sky-solar", description = "Clear-sky GHI/DNI/DHI sensors")
    )
)]
pub struct ApiDoc;
