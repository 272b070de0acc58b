pub mod calibration;
pub mod clear_sky;
pub mod coordinator;
pub mod erbs;
pub mod mqtt_service;
pub mod solar_geometry;
