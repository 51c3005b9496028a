//! Canopy Core - Domain models, provider ports, and configuration
//!
//! This crate contains the value types, the imagery-provider port and the error
//! taxonomy shared by the Canopy vegetation-monitoring crates.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{CanopyError, Result};
