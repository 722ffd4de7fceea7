//! Billing domain errors

use thiserror::Error;

use core_kernel::{MoneyError, PortError};

/// Errors that can occur in the billing domain
///
/// Lookups that find nothing (unknown bill id, unknown mess) are not errors
/// here; the affected operations are silent no-ops or fall back to defaults.
#[derive(Debug, Error)]
pub enum BillingError {
    /// A collaborator (directory, ledger, store, notifier) failed
    #[error("Collaborator error: {0}")]
    Port(#[from] PortError),

    /// Amounts could not be combined
    #[error("Amount error: {0}")]
    Money(#[from] MoneyError),
}
