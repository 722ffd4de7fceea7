//! Mess Billing Domain
//!
//! This crate derives monthly mess bills from recorded meals and reports on
//! consumption and enrollment.
//!
//! # Billing Rules
//!
//! - A student is billed from the calendar month *after* the one they
//!   enrolled in; students without an enrollment date are always billable
//! - At most one bill exists per student and month; generation is idempotent
//! - Only meals eaten at the student's current mess count towards the bill
//! - A month without meals produces no bill
//!
//! # Collaborators
//!
//! The engine reads users, meals and messes through port traits and keeps
//! bills in a whole-collection [`BillStore`]. See [`ports`].
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::BillingEngine;
//! use core_kernel::YearMonth;
//!
//! let engine = BillingEngine::new(users, meals, messes, store);
//!
//! let report = engine.generate_bills_for_month("2024-04".parse()?).await?;
//! println!("{} bills generated", report.generated_count());
//! ```

pub mod records;
pub mod bill;
pub mod eligibility;
pub mod generation;
pub mod consumption;
pub mod summary;
pub mod enrollment;
pub mod ports;
pub mod notification;
pub mod engine;
pub mod error;

pub use records::{User, UserRole, MealRecord, Mess};
pub use bill::{Bill, BillItem, BillStatus, MealType, UNKNOWN_MESS_NAME};
pub use eligibility::{billing_start_month, is_billable_for, is_billing_active};
pub use generation::{GenerationReport, GenerationOutcome, StudentOutcome};
pub use consumption::DailyConsumption;
pub use summary::StudentBillSummary;
pub use enrollment::{
    EnrollmentStatus, StatusFilter, StudentFilter, StudentEnrollment,
    EnrollmentOverview, EnrollmentReport,
};
pub use ports::{UserDirectory, MealLedger, MessDirectory, BillStore, NotificationSender};
pub use notification::LoggingNotifier;
pub use engine::BillingEngine;
pub use error::BillingError;
