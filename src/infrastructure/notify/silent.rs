use crate::domain::ports::errors::NotifyError;
use crate::domain::ports::Notifier;
use async_trait::async_trait;
use tracing::debug;

/// No-op notifier used when no destinations are configured. The caller
/// still runs its full logic; only delivery is skipped.
pub struct SilentNotifier;

#[async_trait]
impl Notifier for SilentNotifier {
    async fn send(&self, destination: &str, _text: &str) -> Result<(), NotifyError> {
        debug!(destination, "delivery skipped, no notifier configured");
        Ok(())
    }
}
