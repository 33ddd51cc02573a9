//! Domain models: pure data types with no I/O.

pub mod alert;
pub mod config;
pub mod scenario;
pub mod signal;
pub mod threat;

pub use alert::{
    AlertLevel, CooldownLogEntry, DeliveryStatus, TriggerConfig, TriggerKind, TriggerOutcome,
};
pub use config::{AnalyzerConfig, Config, DatabaseConfig, LoggingConfig, NotifyConfig};
pub use scenario::{
    AnalysisResponse, CollectedData, CollectedMapEvent, CollectedNews, CollectedOil,
    CollectedSecurityAlert, CollectedTraffic, MarketImpact, NewScenarioState, ScenarioAlertLevel,
    ScenarioId, ScenarioProbabilities, ScenarioState, ScenarioUpdate, VariableChange,
    HEADLINE_VARIABLES,
};
pub use signal::{
    MapEvent, NewsItem, NewsSeverity, PeriodType, PriceTick, SecurityAlert, SecurityThreatLevel,
    ShippingIndicator, TrafficSnapshot,
};
pub use threat::{ThreatLevel, ThreatScore};
