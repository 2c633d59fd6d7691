//! Notification collaborator.
//!
//! Report creation fires a best-effort notification. Delivery is a
//! fire-and-forget dispatch: failures are logged and never surface to the
//! caller who already got a successful response.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

/// Notification delivery failure.
#[derive(Debug, Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

/// Outbound notification sink.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Announce a freshly created report.
    async fn report_created(&self, report_id: u64, title: &str) -> Result<(), NotifyError>;
}

/// Default sink: writes the notification to the log. Stands in for a real
/// message-queue producer.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn report_created(&self, report_id: u64, title: &str) -> Result<(), NotifyError> {
        info!(report_id, title, "report created");
        Ok(())
    }
}
