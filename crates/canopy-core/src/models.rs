pub mod analysis;
pub mod bounds;
pub mod change;
pub mod index;
pub mod scene;
pub mod vegetation;
pub mod window;

pub use analysis::{
    AnalysisPeriod, AnalysisQuality, AreaAnalysis, CarbonImpactAssessment, ChangeSummary,
    IndexSynthesisSummary, PartialResultWarning, ProcessingInfo, ProjectAnalysisReport,
    ProviderOutcome, SequestrationPotential, SynthesizedProjectAnalysis, VegetationMonitoring,
    VegetationTrend,
};
pub use bounds::{validate_bounds, GeoBounds};
pub use change::{
    ChangeAreaMetrics, ChangeDetectionResult, ChangeQualityAssessment, ChangeType,
    EnvironmentalImpact, IndexDeltas,
};
pub use index::IndexType;
pub use scene::{sort_by_acquisition, SceneMetadata};
pub use vegetation::{
    ConfidenceLevel, IndexStatistics, Interpretation, ProcessingMetadata, QualityFlags,
    SensorSummary, VegetationIndexResult,
};
pub use window::DateWindow;
