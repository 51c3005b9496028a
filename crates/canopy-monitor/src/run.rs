use canopy_core::models::{
    ChangeDetectionResult, PartialResultWarning, ProviderOutcome, SceneMetadata,
    VegetationIndexResult,
};
use canopy_core::Result;

/// Sub-query names used in warnings
pub const BASELINE: &str = "baseline_vegetation";
pub const CURRENT: &str = "current_vegetation";
pub const CHANGE: &str = "change_detection";
pub const IMAGERY: &str = "imagery_metadata";

/// Results of one provider's four sub-queries
#[derive(Debug, Clone)]
pub struct ProviderRun {
    pub provider: String,
    pub baseline: Option<VegetationIndexResult>,
    pub current: Option<VegetationIndexResult>,
    pub change: Option<ChangeDetectionResult>,
    pub imagery: Option<Vec<SceneMetadata>>,
    pub warnings: Vec<PartialResultWarning>,
}

impl ProviderRun {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            baseline: None,
            current: None,
            change: None,
            imagery: None,
            warnings: Vec::new(),
        }
    }

    /// Keep a sub-query's value, or record its failure as a warning
    pub fn record<T>(&mut self, operation: &str, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(
                    provider = %self.provider,
                    operation,
                    error = %e,
                    "Sub-query failed"
                );
                self.warnings.push(PartialResultWarning {
                    provider: self.provider.clone(),
                    operation: operation.to_string(),
                    message: e.to_string(),
                });
                None
            }
        }
    }

    pub fn fields_populated(&self) -> usize {
        [
            self.baseline.is_some(),
            self.current.is_some(),
            self.change.is_some(),
            self.imagery.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    /// At least one sub-query answered
    pub fn succeeded(&self) -> bool {
        self.fields_populated() > 0
    }

    pub fn is_complete(&self) -> bool {
        self.fields_populated() == 4
    }

    pub fn outcome(&self) -> ProviderOutcome {
        ProviderOutcome {
            provider: self.provider.clone(),
            success: self.succeeded(),
            fields_populated: self.fields_populated(),
            warnings: self.warnings.clone(),
        }
    }

    /// One-line description of why the run failed
    pub fn failure_summary(&self) -> String {
        let messages: Vec<String> = self
            .warnings
            .iter()
            .map(|warning| format!("{}: {}", warning.operation, warning.message))
            .collect();
        if messages.is_empty() {
            format!("{}: no results", self.provider)
        } else {
            format!("{}: {}", self.provider, messages.join("; "))
        }
    }
}

/// Earliest run with the most populated fields
pub fn most_complete(runs: &[ProviderRun]) -> Option<&ProviderRun> {
    runs.iter().fold(None, |best: Option<&ProviderRun>, run| match best {
        Some(current) if current.fields_populated() >= run.fields_populated() => Some(current),
        _ => Some(run),
    })
}
