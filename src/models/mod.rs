pub mod api;
pub mod irradiance;
pub mod sensor;
