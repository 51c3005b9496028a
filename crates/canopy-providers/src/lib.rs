//! Satellite imagery providers.
//!
//! Every provider is a [`CatalogProvider`] over a [`SceneSource`]: the
//! source decides where scenes come from (a live catalog, synthetic
//! calendars, or a live catalog with synthetic fallback) and the provider
//! turns scenes into index results and change classifications using the
//! numbers in its [`SensorProfile`].

pub mod catalog;
pub mod classify;
pub mod fallback;
pub mod profile;
pub mod provider;
pub mod random;
pub mod registry;
pub mod synthetic;

pub use catalog::{
    CatalogClient, CatalogClientOptions, CatalogCredentials, CatalogRecord, LiveCatalog, SceneQuery,
};
pub use classify::{classify, Classification};
pub use fallback::{LiveWithSyntheticFallback, SceneSource, SyntheticScenes};
pub use profile::{ChangeCurve, SceneFlavor, SensorProfile};
pub use provider::{CatalogBackedProvider, CatalogProvider, LiveProvider, SimulatedProvider};
pub use random::SeedSource;
pub use registry::{ProviderRegistry, HIGHRES, MODERATE, SIMULATED};
pub use synthetic::{SyntheticMeasurement, SyntheticStrategy};

/// Round to a fixed number of decimal places
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
