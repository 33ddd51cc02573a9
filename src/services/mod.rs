//! Domain services: scoring, trigger evaluation, dispatch, and the
//! scenario pipeline.

pub mod dispatcher;
pub mod scenario_collector;
pub mod scenario_dispatcher;
pub mod scenario_pipeline;
pub mod scenario_state;
pub mod threat_scorer;
pub mod trigger_evaluator;

pub use dispatcher::{Dispatcher, RunSummary};
pub use scenario_collector::ScenarioCollector;
pub use scenario_dispatcher::ScenarioDispatcher;
pub use scenario_pipeline::{has_significant_updates, PipelineOutcome, ScenarioPipeline};
pub use scenario_state::ScenarioStateManager;
pub use threat_scorer::ThreatScorer;
pub use trigger_evaluator::TriggerEvaluator;
