use crate::domain::ports::errors::NotifyError;
use async_trait::async_trait;

/// Port for delivering a formatted text message to one destination.
///
/// The dispatcher fans out over the configured destination list; a failure
/// for one destination is logged and never aborts the rest of the fan-out.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, destination: &str, text: &str) -> Result<(), NotifyError>;
}
