//! Named registry of imagery providers.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use canopy_core::config::LayeredConfig;
use canopy_core::ports::{ImageryProvider, ProviderSummary};
use canopy_core::{CanopyError, Result};

use crate::catalog::{CatalogClient, CatalogClientOptions};
use crate::fallback::LiveWithSyntheticFallback;
use crate::provider::{CatalogProvider, SimulatedProvider};
use crate::random::SeedSource;

pub const SIMULATED: &str = "simulated";
pub const HIGHRES: &str = "highres";
pub const MODERATE: &str = "moderate";

/// Providers keyed by name.
///
/// The simulated provider is always present so that every analysis has at
/// least one source that answers.
pub struct ProviderRegistry {
    providers: BTreeMap<String, Arc<dyn ImageryProvider>>,
}

impl ProviderRegistry {
    /// Registry holding only the simulated provider
    pub fn new(seed: SeedSource) -> Self {
        let mut providers: BTreeMap<String, Arc<dyn ImageryProvider>> = BTreeMap::new();
        providers.insert(SIMULATED.to_string(), Arc::new(SimulatedProvider::new(seed)));
        Self { providers }
    }

    /// Registry with the simulated, high-resolution and moderate-resolution
    /// providers, catalogs configured from `config`
    pub fn from_config(config: &LayeredConfig) -> Result<Self> {
        let seed = SeedSource::from_option(config.seed.value);
        let options = CatalogClientOptions {
            request_timeout: config.request_timeout(),
            max_retries: config.max_retries.value,
        };
        let deadline = live_deadline(config.subquery_timeout());

        let mut registry = Self::new(seed);

        let highres = CatalogClient::from_config(HIGHRES, &config.highres, options.clone())?;
        if !highres.has_credentials() {
            tracing::info!(provider = HIGHRES, "No catalog credentials, synthetic scenes only");
        }
        registry.register(Arc::new(
            CatalogProvider::high_resolution(highres, seed).with_live_deadline(deadline),
        ));

        let moderate = CatalogClient::from_config(MODERATE, &config.moderate, options)?;
        if !moderate.has_credentials() {
            tracing::info!(provider = MODERATE, "No catalog credentials, synthetic scenes only");
        }
        registry.register(Arc::new(
            CatalogProvider::moderate_resolution(moderate, seed).with_live_deadline(deadline),
        ));

        Ok(registry)
    }

    /// Register a provider under its own name, replacing any provider of
    /// that name
    pub fn register(&mut self, provider: Arc<dyn ImageryProvider>) -> Option<Arc<dyn ImageryProvider>> {
        let name = provider.name().to_string();
        tracing::debug!(provider = %name, "Registered imagery provider");
        self.providers.insert(name, provider)
    }

    /// Remove a provider. The simulated provider cannot be removed.
    pub fn remove(&mut self, name: &str) -> Result<Option<Arc<dyn ImageryProvider>>> {
        if name == SIMULATED {
            return Err(CanopyError::ConfigInvalid {
                key: "providers".to_string(),
                reason: "the simulated provider cannot be removed".to_string(),
            });
        }
        Ok(self.providers.remove(name))
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ImageryProvider>> {
        self.providers.get(name).cloned()
    }

    /// Provider by name, or an `UnknownProvider` error
    pub fn require(&self, name: &str) -> Result<Arc<dyn ImageryProvider>> {
        self.get(name).ok_or_else(|| CanopyError::UnknownProvider { name: name.to_string() })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Registered names in alphabetical order
    pub fn names(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }

    pub fn summaries(&self) -> Vec<ProviderSummary> {
        self.providers.values().map(|provider| provider.summary()).collect()
    }

    /// Live-capable providers by finest resolution, then other providers by
    /// resolution, then simulated
    pub fn default_priority(&self) -> Vec<String> {
        let mut ranked: Vec<ProviderSummary> = self
            .summaries()
            .into_iter()
            .filter(|summary| summary.name != SIMULATED)
            .collect();
        ranked.sort_by(|a, b| {
            b.live_capable
                .cmp(&a.live_capable)
                .then(a.resolution_m.total_cmp(&b.resolution_m))
                .then_with(|| a.name.cmp(&b.name))
        });

        let mut order: Vec<String> = ranked.into_iter().map(|summary| summary.name).collect();
        order.push(SIMULATED.to_string());
        order
    }

    /// Resolve a caller preference list to registered providers.
    ///
    /// Unknown names are logged and dropped, duplicates keep their first
    /// position. An empty result falls back to [`Self::default_priority`].
    pub fn select(&self, preference: Option<&[String]>) -> Vec<String> {
        let mut selected: Vec<String> = Vec::new();

        for name in preference.unwrap_or_default() {
            let name = name.trim().to_lowercase();
            if !self.contains(&name) {
                tracing::warn!(provider = %name, "Ignoring unknown provider in preference list");
                continue;
            }
            if !selected.contains(&name) {
                selected.push(name);
            }
        }

        if selected.is_empty() {
            return self.default_priority();
        }
        selected
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new(SeedSource::Entropy)
    }
}

/// Live search budget: the fallback default, capped at half the sub-query
/// timeout
fn live_deadline(subquery_timeout: Option<Duration>) -> Duration {
    let default = LiveWithSyntheticFallback::<CatalogClient>::DEFAULT_LIVE_DEADLINE;
    match subquery_timeout {
        Some(timeout) => default.min(timeout / 2),
        None => default,
    }
}
