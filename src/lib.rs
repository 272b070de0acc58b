//! Clear-sky solar irradiance (GHI, DNI, DHI) for a site and instant.
//!
//! The model is a modified Haurwitz global-horizontal estimate, capped against
//! the extraterrestrial horizontal irradiance and split into beam and diffuse
//! parts with the ERBS diffuse-fraction correlation. Everything under
//! [`services`] except the coordinator and MQTT publisher is pure and
//! synchronous.

pub mod api_docs;
pub mod config;
pub mod controllers;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod shared_state;

pub use crate::error::{ClearSkyError, Result};
pub use crate::models::irradiance::{ClearSkyResult, SiteParameters};
pub use crate::models::sensor::{DHI, DNI, GHI, UPDATE_INTERVAL};
pub use crate::services::calibration::{CalibrationWindow, estimate_site_scale_factor};
pub use crate::services::clear_sky::{compute_clear_sky, compute_clear_sky_with};
pub use crate::services::solar_geometry::{SolarElevation, SpaElevation};
