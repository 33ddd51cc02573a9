//! Notification fan-out for fired triggers.

use crate::domain::models::{CooldownLogEntry, DeliveryStatus, TriggerOutcome};
use crate::domain::ports::{AlertLedger, Notifier};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Per-run counts reported back to the scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub checked: usize,
    pub fired: usize,
    pub cooldown_suppressed: usize,
    pub sent: usize,
    pub failed: usize,
}

impl RunSummary {
    /// Result of a short-circuited run with no destinations configured.
    pub const fn zero_work() -> Self {
        Self {
            checked: 0,
            fired: 0,
            cooldown_suppressed: 0,
            sent: 0,
            failed: 0,
        }
    }
}

/// Broadcasts fired trigger messages and records every delivery attempt.
pub struct Dispatcher {
    notifier: Arc<dyn Notifier>,
    ledger: Arc<dyn AlertLedger>,
    destinations: Vec<String>,
}

impl Dispatcher {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        ledger: Arc<dyn AlertLedger>,
        destinations: Vec<String>,
    ) -> Self {
        Self {
            notifier,
            ledger,
            destinations,
        }
    }

    /// Fan out each fired outcome to every destination. Every attempt is
    /// logged to the ledger, failed sends included, so a misconfigured
    /// destination still opens the cooldown window instead of retry-storming.
    pub async fn dispatch(&self, outcomes: &[TriggerOutcome]) -> RunSummary {
        let mut summary = RunSummary {
            checked: outcomes.len(),
            ..RunSummary::default()
        };

        for outcome in outcomes {
            if outcome.cooldown_suppressed {
                summary.cooldown_suppressed += 1;
                continue;
            }
            let (true, Some(message)) = (outcome.fired, outcome.message.as_ref()) else {
                continue;
            };
            summary.fired += 1;

            for destination in &self.destinations {
                let status = match self.notifier.send(destination, message).await {
                    Ok(()) => {
                        summary.sent += 1;
                        DeliveryStatus::Sent
                    }
                    Err(e) => {
                        warn!(
                            trigger = %outcome.kind,
                            destination = %destination,
                            error = %e,
                            "notification delivery failed"
                        );
                        summary.failed += 1;
                        DeliveryStatus::Failed
                    }
                };

                let entry = CooldownLogEntry {
                    trigger_type: outcome.kind,
                    alert_level: outcome.level,
                    message: message.clone(),
                    destination: destination.clone(),
                    delivery_status: status,
                    sent_at: Utc::now(),
                };
                if let Err(e) = self.ledger.append(&entry).await {
                    error!(trigger = %outcome.kind, error = %e, "failed to record delivery");
                }
            }
        }

        info!(
            checked = summary.checked,
            fired = summary.fired,
            suppressed = summary.cooldown_suppressed,
            sent = summary.sent,
            failed = summary.failed,
            "trigger run complete"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{AlertLevel, TriggerKind};
    use crate::domain::ports::errors::{NotifyError, StoreError};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::sync::Mutex;

    struct RecordingNotifier {
        fail_on: Option<String>,
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, destination: &str, _text: &str) -> Result<(), NotifyError> {
            if self.fail_on.as_deref() == Some(destination) {
                return Err(NotifyError::SendFailed {
                    destination: destination.to_string(),
                    reason: "connection refused".to_string(),
                });
            }
            self.sent.lock().unwrap().push(destination.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingLedger {
        entries: Mutex<Vec<CooldownLogEntry>>,
    }

    #[async_trait]
    impl AlertLedger for RecordingLedger {
        async fn in_cooldown(
            &self,
            _kind: TriggerKind,
            _since: DateTime<Utc>,
        ) -> Result<bool, StoreError> {
            Ok(false)
        }

        async fn append(&self, entry: &CooldownLogEntry) -> Result<(), StoreError> {
            self.entries.lock().unwrap().push(entry.clone());
            Ok(())
        }
    }

    fn fired(kind: TriggerKind) -> TriggerOutcome {
        TriggerOutcome::fired(kind, "message".to_string())
    }

    #[tokio::test]
    async fn one_failing_destination_does_not_abort_fan_out() {
        let notifier = Arc::new(RecordingNotifier {
            fail_on: Some("chat-2".to_string()),
            sent: Mutex::new(vec![]),
        });
        let ledger = Arc::new(RecordingLedger::default());
        let dispatcher = Dispatcher::new(
            notifier.clone(),
            ledger.clone(),
            vec!["chat-1".into(), "chat-2".into(), "chat-3".into()],
        );

        let summary = dispatcher.dispatch(&[fired(TriggerKind::OilSpike)]).await;

        assert_eq!(summary.sent, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(
            *notifier.sent.lock().unwrap(),
            vec!["chat-1".to_string(), "chat-3".to_string()]
        );
        // all three attempts logged, the failure included
        let entries = ledger.entries.lock().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries
                .iter()
                .filter(|e| e.delivery_status == DeliveryStatus::Failed)
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn suppressed_and_quiet_outcomes_send_nothing() {
        let notifier = Arc::new(RecordingNotifier {
            fail_on: None,
            sent: Mutex::new(vec![]),
        });
        let ledger = Arc::new(RecordingLedger::default());
        let dispatcher = Dispatcher::new(notifier.clone(), ledger.clone(), vec!["chat-1".into()]);

        let outcomes = vec![
            TriggerOutcome::quiet(TriggerKind::TrafficDrop),
            TriggerOutcome::suppressed(TriggerKind::OilSpike),
        ];
        let summary = dispatcher.dispatch(&outcomes).await;

        assert_eq!(summary.checked, 2);
        assert_eq!(summary.fired, 0);
        assert_eq!(summary.cooldown_suppressed, 1);
        assert!(notifier.sent.lock().unwrap().is_empty());
        assert!(ledger.entries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upgraded_severity_is_logged_as_carried() {
        let notifier = Arc::new(RecordingNotifier {
            fail_on: None,
            sent: Mutex::new(vec![]),
        });
        let ledger = Arc::new(RecordingLedger::default());
        let dispatcher = Dispatcher::new(notifier, ledger.clone(), vec!["chat-1".into()]);

        let outcome =
            TriggerOutcome::fired_at(TriggerKind::OilSpike, AlertLevel::Critical, "big".into());
        dispatcher.dispatch(&[outcome]).await;

        let entries = ledger.entries.lock().unwrap();
        assert_eq!(entries[0].alert_level, AlertLevel::Critical);
    }
}
