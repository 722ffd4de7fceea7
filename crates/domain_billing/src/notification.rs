//! Default notification sender

use async_trait::async_trait;
use tracing::info;

use core_kernel::{BillId, DomainPort, PortError};

use crate::ports::NotificationSender;

/// Acknowledges notification requests in the log without delivering them
///
/// Used until a real delivery channel (mail, push) is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotifier;

impl DomainPort for LoggingNotifier {}

#[async_trait]
impl NotificationSender for LoggingNotifier {
    async fn notify_bills(&self, bill_ids: &[BillId]) -> Result<(), PortError> {
        info!(count = bill_ids.len(), "Sent notifications for {} bills", bill_ids.len());
        Ok(())
    }
}
