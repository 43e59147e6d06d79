pub mod configuration;
pub mod db;
pub mod models;
pub mod services;
pub mod telemetry;
