//! Port implementations over the record store
//!
//! One [`JsonRecordStore`] serves as user directory, meal ledger, mess
//! directory and bill store at once; each port reads its own collection.

use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, instrument};

use core_kernel::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_billing::ports::{BillStore, MealLedger, MessDirectory, UserDirectory};
use domain_billing::{Bill, MealRecord, Mess, User};

use crate::json_store::{Collection, JsonRecordStore};

const ADAPTER_ID: &str = "json-record-store";

impl DomainPort for JsonRecordStore {}

#[async_trait]
impl HealthCheckable for JsonRecordStore {
    /// Checks that the data directory is still reachable
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let result = self.check_data_dir().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let (status, message) = match result {
            Ok(()) if self.config().is_persistent() => (AdapterHealth::Healthy, None),
            Ok(()) => (AdapterHealth::Healthy, Some("In-memory store".to_string())),
            Err(e) => (AdapterHealth::Unhealthy, Some(format!("Data directory unavailable: {}", e))),
        };

        HealthCheckResult {
            adapter_id: ADAPTER_ID.to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl UserDirectory for JsonRecordStore {
    #[instrument(skip(self))]
    async fn get_users(&self) -> Result<Vec<User>, PortError> {
        let users: Vec<User> = self.load(Collection::Users).await;
        debug!(count = users.len(), "Loaded users");
        Ok(users)
    }
}

#[async_trait]
impl MealLedger for JsonRecordStore {
    #[instrument(skip(self))]
    async fn get_meal_records(&self) -> Result<Vec<MealRecord>, PortError> {
        let meals: Vec<MealRecord> = self.load(Collection::MealRecords).await;
        debug!(count = meals.len(), "Loaded meal records");
        Ok(meals)
    }
}

#[async_trait]
impl MessDirectory for JsonRecordStore {
    #[instrument(skip(self))]
    async fn get_messes(&self) -> Result<Vec<Mess>, PortError> {
        let messes: Vec<Mess> = self.load(Collection::Messes).await;
        debug!(count = messes.len(), "Loaded messes");
        Ok(messes)
    }
}

#[async_trait]
impl BillStore for JsonRecordStore {
    #[instrument(skip(self))]
    async fn load_bills(&self) -> Result<Vec<Bill>, PortError> {
        let bills: Vec<Bill> = self.load(Collection::MessBills).await;
        debug!(count = bills.len(), "Loaded bills");
        Ok(bills)
    }

    #[instrument(skip(self, bills), fields(count = bills.len()))]
    async fn save_bills(&self, bills: &[Bill]) -> Result<(), PortError> {
        self.save(Collection::MessBills, bills).await?;
        Ok(())
    }
}
