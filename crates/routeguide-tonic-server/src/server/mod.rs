pub mod config;
pub mod data;
pub mod service;
pub mod streaming;
pub mod telemetry;
