//! JSON scene-search client for live imagery catalogs.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use canopy_core::config::CatalogConfig;
use canopy_core::models::{DateWindow, GeoBounds};
use canopy_core::{CanopyError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Parameters of one scene search
#[derive(Debug, Clone, Copy)]
pub struct SceneQuery<'a> {
    pub bounds: &'a GeoBounds,
    pub window: &'a DateWindow,
    pub max_cloud_cover_pct: Option<f64>,
    pub limit: Option<usize>,
}

/// One scene as reported by a catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: String,

    #[serde(alias = "date")]
    pub acquisition_date: NaiveDate,

    #[serde(alias = "cloud_cover")]
    pub cloud_cover_pct: f64,

    /// Reference to the data product
    #[serde(alias = "url")]
    pub href: String,

    #[serde(default)]
    pub platform: Option<String>,

    #[serde(default)]
    pub processing_level: Option<String>,

    /// Any other fields the catalog sends
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Live source of scene records
#[async_trait]
pub trait LiveCatalog: Send + Sync {
    async fn search(&self, query: SceneQuery<'_>) -> Result<Vec<CatalogRecord>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogCredentials {
    Basic { username: String, password: String },
    Bearer(String),
}

impl CatalogCredentials {
    /// Credentials from a catalog config section, preferring a token
    pub fn from_config(config: &CatalogConfig) -> Option<Self> {
        if let Some(token) = &config.token.value {
            return Some(CatalogCredentials::Bearer(token.clone()));
        }
        match (&config.username.value, &config.password.value) {
            (Some(username), Some(password)) => Some(CatalogCredentials::Basic {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }
}

/// Options for [`CatalogClient`]
#[derive(Debug, Clone)]
pub struct CatalogClientOptions {
    pub request_timeout: Duration,
    /// Retries after the first attempt on transport errors and 5xx responses
    pub max_retries: u32,
}

impl Default for CatalogClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_retries: 3,
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    dataset: &'a str,
    bbox: [f64; 4],
    datetime: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_cloud_cover: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(alias = "results", alias = "features")]
    scenes: Vec<CatalogRecord>,
}

/// Authenticated `POST {base}/scene-search` client
pub struct CatalogClient {
    provider: String,
    base_url: Option<String>,
    dataset: String,
    credentials: Option<CatalogCredentials>,
    client: reqwest::Client,
    options: CatalogClientOptions,
}

impl CatalogClient {
    pub fn new(
        provider: impl Into<String>,
        base_url: Option<String>,
        dataset: impl Into<String>,
        credentials: Option<CatalogCredentials>,
        options: CatalogClientOptions,
    ) -> Result<Self> {
        let provider = provider.into();
        let client = reqwest::Client::builder()
            .timeout(options.request_timeout)
            .build()
            .map_err(|e| CanopyError::ProviderUnavailable {
                provider: provider.clone(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            provider,
            base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
            dataset: dataset.into(),
            credentials,
            client,
            options,
        })
    }

    /// Client for a configured catalog section; unset credentials are allowed
    /// and reported on first search
    pub fn from_config(
        provider: impl Into<String>,
        config: &CatalogConfig,
        options: CatalogClientOptions,
    ) -> Result<Self> {
        Self::new(
            provider,
            config.url.value.clone(),
            config.dataset.value.clone(),
            CatalogCredentials::from_config(config),
            options,
        )
    }

    pub fn has_credentials(&self) -> bool {
        self.base_url.is_some() && self.credentials.is_some()
    }

    fn unavailable(&self, reason: impl Into<String>) -> CanopyError {
        CanopyError::ProviderUnavailable {
            provider: self.provider.clone(),
            reason: reason.into(),
        }
    }

    fn request(&self, url: &str, body: &SearchRequest<'_>) -> reqwest::RequestBuilder {
        let builder = self.client.post(url).json(body);
        match &self.credentials {
            Some(CatalogCredentials::Basic { username, password }) => {
                builder.basic_auth(username, Some(password))
            }
            Some(CatalogCredentials::Bearer(token)) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait]
impl LiveCatalog for CatalogClient {
    async fn search(&self, query: SceneQuery<'_>) -> Result<Vec<CatalogRecord>> {
        let Some(base_url) = &self.base_url else {
            return Err(self.unavailable("no catalog URL configured"));
        };
        if self.credentials.is_none() {
            return Err(self.unavailable("missing catalog credentials"));
        }

        let url = format!("{base_url}/scene-search");
        let body = SearchRequest {
            dataset: &self.dataset,
            bbox: query.bounds.as_array(),
            datetime: format!("{}/{}", query.window.start(), query.window.end()),
            max_cloud_cover: query.max_cloud_cover_pct,
            limit: query.limit,
        };

        let mut last_err = None;

        for attempt in 0..=self.options.max_retries {
            if attempt > 0 {
                // 500ms, 1s, 2s, ...
                let delay = Duration::from_millis(500 * (1 << (attempt - 1).min(6)));
                tokio::time::sleep(delay).await;
            }

            tracing::debug!(provider = %self.provider, attempt, url = %url, "Catalog scene search");

            match self.request(&url, &body).send().await {
                Ok(response) if response.status().is_success() => {
                    let parsed: SearchResponse = response
                        .json()
                        .await
                        .map_err(|e| self.unavailable(format!("malformed catalog response: {e}")))?;
                    tracing::info!(
                        provider = %self.provider,
                        count = parsed.scenes.len(),
                        "Catalog returned scenes"
                    );
                    return Ok(parsed.scenes);
                }
                Ok(response) => {
                    let status = response.status();
                    let text = response.text().await.unwrap_or_default();
                    last_err = Some(self.unavailable(format!(
                        "catalog returned HTTP {}: {}",
                        status,
                        text.chars().take(300).collect::<String>()
                    )));
                    // Client errors will not change on retry
                    if status.is_client_error() {
                        break;
                    }
                }
                Err(e) if e.is_timeout() => {
                    last_err = Some(CanopyError::Timeout {
                        provider: self.provider.clone(),
                        operation: "scene_search".to_string(),
                    });
                }
                Err(e) => {
                    last_err = Some(self.unavailable(format!("catalog request failed: {e}")));
                }
            }
        }

        Err(last_err.unwrap_or_else(|| self.unavailable("catalog search failed")))
    }
}
