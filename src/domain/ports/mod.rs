//! Ports: async traits at the seams between domain logic and the outside
//! world. Infrastructure provides the implementations; tests provide mocks.

pub mod alert_ledger;
pub mod analyzer;
pub mod errors;
pub mod notifier;
pub mod scenario_store;
pub mod signal_store;

pub use alert_ledger::AlertLedger;
pub use analyzer::ScenarioAnalyzer;
pub use errors::{AnalyzerError, NotifyError, StoreError};
pub use notifier::Notifier;
pub use scenario_store::ScenarioStore;
pub use signal_store::SignalStore;
