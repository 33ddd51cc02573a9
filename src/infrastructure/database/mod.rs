//! SQLite implementations of the storage ports.

mod alert_ledger;
mod connection;
mod scenario_store;
mod signal_store;
pub mod utils;

pub use alert_ledger::SqliteAlertLedger;
pub use connection::DatabaseConnection;
pub use scenario_store::SqliteScenarioStore;
pub use signal_store::SqliteSignalStore;
