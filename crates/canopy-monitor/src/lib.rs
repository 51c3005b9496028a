//! Project-level vegetation monitoring.
//!
//! [`MonitoringOrchestrator`] runs each analysis through four phases:
//! provider selection, a concurrent fan-out of sub-queries per provider,
//! synthesis of the most complete run, and report assembly.

pub mod orchestrator;
pub mod run;
pub mod settings;
pub mod synthesis;

pub use orchestrator::{ImageryListing, IndexReport, MonitoringOrchestrator};
pub use run::ProviderRun;
pub use settings::MonitorSettings;
