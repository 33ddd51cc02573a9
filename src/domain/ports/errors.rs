use thiserror::Error;

/// Signal store / ledger operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("query failed: {0}")]
    QueryFailed(#[from] sqlx::Error),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(#[from] chrono::ParseError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid enum value: {0}")]
    InvalidValue(String),

    #[error("connection pool error: {0}")]
    ConnectionPool(String),

    #[error("migration error: {0}")]
    Migration(String),
}

/// Reasoning service call errors. All of these fail the cycle closed:
/// nothing is persisted and the next run starts from the previous state.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("no JSON object found in response text")]
    NoJsonPayload,

    #[error("malformed analysis response: {0}")]
    MalformedResponse(String),

    #[error("analyzer not configured: {0}")]
    NotConfigured(String),
}

/// Notification delivery errors. Contained per destination; the fan-out
/// continues past them.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("send to {destination} failed: {reason}")]
    SendFailed { destination: String, reason: String },

    #[error("notifier not configured: {0}")]
    NotConfigured(String),
}
