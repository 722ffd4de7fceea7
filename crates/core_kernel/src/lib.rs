//! Core Kernel - Foundational types for the mess billing system
//!
//! This crate provides the building blocks shared by every other crate:
//! - Money types with precise decimal arithmetic
//! - Calendar month handling for monthly billing cycles
//! - Identifiers for bills, users, and messes
//! - Port error and health types for swappable collaborators

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use money::{Money, Currency, MoneyError};
pub use temporal::{YearMonth, TemporalError};
pub use identifiers::{BillId, UserId, MessId};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use error::CoreError;
