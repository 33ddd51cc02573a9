use crate::domain::models::{AnalysisResponse, CollectedData, ScenarioState};
use crate::domain::ports::errors::AnalyzerError;
use async_trait::async_trait;

/// Port to the external reasoning service.
///
/// The service consumes the collected delta payload plus the current state
/// and returns updated probabilities, variable changes and alert text. It is
/// a black box: this crate validates only the shape of the response and
/// never re-derives the reasoning. Expensive and slow by assumption, so
/// implementations must bound every call with a timeout; a timeout means
/// "no update this cycle", not a crash.
#[async_trait]
pub trait ScenarioAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        current_state: Option<&ScenarioState>,
        data: &CollectedData,
    ) -> Result<AnalysisResponse, AnalyzerError>;
}
