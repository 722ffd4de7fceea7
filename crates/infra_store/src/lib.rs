//! Infrastructure Record Store
//!
//! This crate persists the billing data as whole JSON collections, one file
//! per collection under a data directory, and implements the billing
//! collaborator ports on top of them.
//!
//! # Collections
//!
//! | Key | Records |
//! |---|---|
//! | `mess_bills` | [`domain_billing::Bill`] |
//! | `users` | [`domain_billing::User`] |
//! | `meal_records` | [`domain_billing::MealRecord`] |
//! | `messes` | [`domain_billing::Mess`] |
//!
//! A missing file is an empty collection. A file that does not hold a JSON
//! array of the expected records is logged and treated as empty.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_store::{JsonRecordStore, StoreConfig};
//! use std::sync::Arc;
//!
//! let store = Arc::new(JsonRecordStore::open(StoreConfig::new("./data")).await?);
//! let engine = BillingEngine::new(store.clone(), store.clone(), store.clone(), store.clone());
//! // ...
//! store.close().await?;
//! ```

pub mod config;
pub mod error;
pub mod json_store;
pub mod adapters;

pub use config::StoreConfig;
pub use error::StoreError;
pub use json_store::{Collection, JsonRecordStore};
