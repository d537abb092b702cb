//! # StarCharge - EV charging station telemetry bridge
//!
//! Polls the StarCharge vendor HTTP API for one charging station and exposes
//! the derived values (voltage, current, power, status) as sensors.
//!
//! ## Architecture
//!
//! - `config`: YAML application configuration and validation
//! - `logging`: Structured logging and tracing
//! - `status`: Vendor status code table
//! - `api`: Request description, HTTP transport, envelope parsing, fetching
//! - `setup`: One-time validation of the user's API configuration
//! - `coordinator`: Periodic refresh and snapshot publication
//! - `sensor`: Read-only sensor projections over the latest snapshot
//! - `station`: Wiring of coordinator and sensors for one station
//! - `web`: HTTP server exposing sensors and the setup form

pub mod api;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod logging;
pub mod sensor;
pub mod setup;
pub mod station;
pub mod status;
pub mod web;


// Re-export commonly used types
pub use config::Config;
pub use coordinator::StationCoordinator;
pub use error::{FetchError, Result, SetupError, StarChargeError};
pub use station::Station;
