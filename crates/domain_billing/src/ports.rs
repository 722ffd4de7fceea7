//! Billing Domain Ports
//!
//! The billing engine reads users, meals and messes from external
//! directories and keeps bills in a whole-collection store. Each of these
//! collaborators is a port trait so adapters can be swapped:
//!
//! - **JSON record store** (`infra_store`): the production adapter
//! - **Mock adapters** (`mock` feature): in-memory, for tests
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_billing::{BillingEngine, ports::BillStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(JsonRecordStore::open(config).await?);
//! let engine = BillingEngine::new(store.clone(), store.clone(), store.clone(), store);
//! ```

use async_trait::async_trait;

use core_kernel::{BillId, DomainPort, HealthCheckable, MessId, PortError};

use crate::bill::Bill;
use crate::records::{MealRecord, Mess, User};

/// Source of registered accounts
#[async_trait]
pub trait UserDirectory: DomainPort {
    /// Returns every registered user, in no particular order
    async fn get_users(&self) -> Result<Vec<User>, PortError>;
}

/// Source of recorded meals
#[async_trait]
pub trait MealLedger: DomainPort {
    /// Returns every recorded meal, in recording order
    async fn get_meal_records(&self) -> Result<Vec<MealRecord>, PortError>;
}

/// Mess id to name lookup
#[async_trait]
pub trait MessDirectory: DomainPort {
    /// Returns every mess
    async fn get_messes(&self) -> Result<Vec<Mess>, PortError>;

    /// Finds a single mess, `None` if unknown
    async fn find_mess(&self, mess_id: &MessId) -> Result<Option<Mess>, PortError> {
        Ok(self
            .get_messes()
            .await?
            .into_iter()
            .find(|m| &m.id == mess_id))
    }
}

/// Whole-collection persistence for bills
///
/// Implementations return an empty collection when nothing has been stored
/// yet, and replace the entire collection on save.
#[async_trait]
pub trait BillStore: DomainPort + HealthCheckable {
    /// Loads the full bill collection
    async fn load_bills(&self) -> Result<Vec<Bill>, PortError>;

    /// Replaces the full bill collection
    async fn save_bills(&self, bills: &[Bill]) -> Result<(), PortError>;
}

/// Delivery of bill notifications to students
#[async_trait]
pub trait NotificationSender: DomainPort {
    /// Notifies the owners of the given bills; best effort
    async fn notify_bills(&self, bill_ids: &[BillId]) -> Result<(), PortError>;
}

/// In-memory port implementations for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use chrono::Utc;
    use core_kernel::{AdapterHealth, HealthCheckResult};

    /// In-memory user directory
    #[derive(Debug, Default, Clone)]
    pub struct MockUserDirectory {
        users: Arc<RwLock<Vec<User>>>,
    }

    impl MockUserDirectory {
        pub fn new(users: Vec<User>) -> Self {
            Self {
                users: Arc::new(RwLock::new(users)),
            }
        }

        /// Replaces the directory contents, e.g. after a student switches mess
        pub async fn set_users(&self, users: Vec<User>) {
            *self.users.write().await = users;
        }
    }

    impl DomainPort for MockUserDirectory {}

    #[async_trait]
    impl UserDirectory for MockUserDirectory {
        async fn get_users(&self) -> Result<Vec<User>, PortError> {
            Ok(self.users.read().await.clone())
        }
    }

    /// In-memory meal ledger
    #[derive(Debug, Default, Clone)]
    pub struct MockMealLedger {
        meals: Arc<RwLock<Vec<MealRecord>>>,
    }

    impl MockMealLedger {
        pub fn new(meals: Vec<MealRecord>) -> Self {
            Self {
                meals: Arc::new(RwLock::new(meals)),
            }
        }

        pub async fn record(&self, meal: MealRecord) {
            self.meals.write().await.push(meal);
        }
    }

    impl DomainPort for MockMealLedger {}

    #[async_trait]
    impl MealLedger for MockMealLedger {
        async fn get_meal_records(&self) -> Result<Vec<MealRecord>, PortError> {
            Ok(self.meals.read().await.clone())
        }
    }

    /// In-memory mess directory
    #[derive(Debug, Default, Clone)]
    pub struct MockMessDirectory {
        messes: Arc<Vec<Mess>>,
    }

    impl MockMessDirectory {
        pub fn new(messes: Vec<Mess>) -> Self {
            Self {
                messes: Arc::new(messes),
            }
        }
    }

    impl DomainPort for MockMessDirectory {}

    #[async_trait]
    impl MessDirectory for MockMessDirectory {
        async fn get_messes(&self) -> Result<Vec<Mess>, PortError> {
            Ok(self.messes.as_ref().clone())
        }
    }

    /// In-memory bill store that counts saves
    #[derive(Debug, Default, Clone)]
    pub struct MockBillStore {
        bills: Arc<RwLock<Vec<Bill>>>,
        saves: Arc<AtomicUsize>,
    }

    impl MockBillStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of `save_bills` calls so far
        pub fn save_count(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }
    }

    impl DomainPort for MockBillStore {}

    #[async_trait]
    impl HealthCheckable for MockBillStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "mock-bill-store".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("Mock adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl BillStore for MockBillStore {
        async fn load_bills(&self) -> Result<Vec<Bill>, PortError> {
            Ok(self.bills.read().await.clone())
        }

        async fn save_bills(&self, bills: &[Bill]) -> Result<(), PortError> {
            *self.bills.write().await = bills.to_vec();
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Notifier that remembers every batch it was asked to send
    #[derive(Debug, Default, Clone)]
    pub struct RecordingNotifier {
        sent: Arc<RwLock<Vec<Vec<BillId>>>>,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn batches(&self) -> Vec<Vec<BillId>> {
            self.sent.read().await.clone()
        }
    }

    impl DomainPort for RecordingNotifier {}

    #[async_trait]
    impl NotificationSender for RecordingNotifier {
        async fn notify_bills(&self, bill_ids: &[BillId]) -> Result<(), PortError> {
            self.sent.write().await.push(bill_ids.to_vec());
            Ok(())
        }
    }
}
