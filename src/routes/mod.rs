pub mod sensor_routes;
