pub mod sensor_controller;
