//! Port trait definitions
//!
//! These traits define the interfaces that imagery providers must implement.

pub mod imagery;

pub use imagery::{ImageryProvider, ProviderSummary, QueryOptions};
