//! Canopy Indices - Vegetation index synthesis and carbon proxies
//!
//! This crate expands a single NDVI/EVI measurement into a fuller set of
//! derived indices, canopy structure estimates and carbon metrics.

pub mod climate;
pub mod interpret;
pub mod synthesizer;

pub use climate::ClimateZone;
pub use synthesizer::{
    CarbonMetrics, DerivedIndex, IndexSynthesis, SynthesisQuality, VegetationIndexSynthesizer,
};
