//! The billing engine
//!
//! Ties the pure billing rules to the collaborator ports. Reads go straight
//! to the ports; every read-modify-write of the bill collection runs under
//! one writer lock, so concurrent callers can never create two bills for
//! the same student and month.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use core_kernel::{BillId, Currency, MessId, UserId, YearMonth};

use crate::bill::{Bill, BillStatus};
use crate::consumption::DailyConsumption;
use crate::enrollment::{EnrollmentReport, StudentFilter};
use crate::error::BillingError;
use crate::generation::{generate_month, GenerationReport};
use crate::notification::LoggingNotifier;
use crate::ports::{BillStore, MealLedger, MessDirectory, NotificationSender, UserDirectory};
use crate::summary::StudentBillSummary;

/// Billing operations over injected collaborators
pub struct BillingEngine {
    users: Arc<dyn UserDirectory>,
    meals: Arc<dyn MealLedger>,
    messes: Arc<dyn MessDirectory>,
    store: Arc<dyn BillStore>,
    notifier: Arc<dyn NotificationSender>,
    currency: Currency,
    write_lock: Mutex<()>,
}

impl BillingEngine {
    /// Creates an engine billing in the default currency, with notifications
    /// acknowledged in the log only
    pub fn new(
        users: Arc<dyn UserDirectory>,
        meals: Arc<dyn MealLedger>,
        messes: Arc<dyn MessDirectory>,
        store: Arc<dyn BillStore>,
    ) -> Self {
        Self {
            users,
            meals,
            messes,
            store,
            notifier: Arc::new(LoggingNotifier),
            currency: Currency::default(),
            write_lock: Mutex::new(()),
        }
    }

    /// Sets the notification sender
    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSender>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Sets the currency of bill totals and reports
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Bill store backing this engine, for health checks
    pub fn store(&self) -> &Arc<dyn BillStore> {
        &self.store
    }

    // ========================================================================
    // Generation
    // ========================================================================

    /// Generates the bills of `month` for every eligible student
    ///
    /// Idempotent: students already billed for the month are skipped. The
    /// bill collection is written once, and only if a bill was created.
    #[instrument(skip(self), fields(month = %month))]
    pub async fn generate_bills_for_month(
        &self,
        month: YearMonth,
    ) -> Result<GenerationReport, BillingError> {
        let users = self.users.get_users().await?;
        let meals = self.meals.get_meal_records().await?;
        let mess_names: HashMap<MessId, String> = self
            .messes
            .get_messes()
            .await?
            .into_iter()
            .map(|m| (m.id, m.name))
            .collect();

        let _guard = self.write_lock.lock().await;
        let mut bills = self.store.load_bills().await?;

        let report = generate_month(
            month,
            &users,
            &meals,
            &mut bills,
            |id| mess_names.get(id).cloned(),
            self.currency,
            Utc::now(),
        )?;

        if report.generated_count() > 0 {
            self.store.save_bills(&bills).await?;
        }

        info!(
            generated = report.generated_count(),
            skipped = report.skipped_count(),
            "Bill generation finished"
        );
        Ok(report)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Returns every bill
    pub async fn get_all_bills(&self) -> Result<Vec<Bill>, BillingError> {
        Ok(self.store.load_bills().await?)
    }

    /// Returns a single bill, `None` if unknown
    pub async fn get_bill(&self, bill_id: BillId) -> Result<Option<Bill>, BillingError> {
        Ok(self
            .store
            .load_bills()
            .await?
            .into_iter()
            .find(|b| b.id == bill_id))
    }

    /// Returns the bills issued by a mess
    pub async fn get_mess_bills(&self, mess_id: &MessId) -> Result<Vec<Bill>, BillingError> {
        let mut bills = self.store.load_bills().await?;
        bills.retain(|b| &b.mess_id == mess_id);
        Ok(bills)
    }

    /// Returns the bills of a student
    pub async fn get_user_bills(&self, user_id: &UserId) -> Result<Vec<Bill>, BillingError> {
        let mut bills = self.store.load_bills().await?;
        bills.retain(|b| &b.student_id == user_id);
        Ok(bills)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Sets the status of a bill
    ///
    /// Returns `false` without touching the store when no bill has this id.
    #[instrument(skip(self), fields(bill_id = %bill_id))]
    pub async fn update_bill_status(
        &self,
        bill_id: BillId,
        status: BillStatus,
    ) -> Result<bool, BillingError> {
        self.modify_bill(bill_id, |bill| bill.status = status).await
    }

    /// Counts one download of a bill document
    ///
    /// Returns `false` without touching the store when no bill has this id.
    #[instrument(skip(self), fields(bill_id = %bill_id))]
    pub async fn record_bill_download(&self, bill_id: BillId) -> Result<bool, BillingError> {
        self.modify_bill(bill_id, Bill::record_download).await
    }

    async fn modify_bill<F>(&self, bill_id: BillId, change: F) -> Result<bool, BillingError>
    where
        F: FnOnce(&mut Bill),
    {
        let _guard = self.write_lock.lock().await;
        let mut bills = self.store.load_bills().await?;

        let Some(bill) = bills.iter_mut().find(|b| b.id == bill_id) else {
            debug!("Bill not found, nothing to update");
            return Ok(false);
        };
        change(bill);

        self.store.save_bills(&bills).await?;
        Ok(true)
    }

    /// Asks the notification sender to notify the owners of the given bills
    #[instrument(skip(self, bill_ids), fields(count = bill_ids.len()))]
    pub async fn send_bill_notifications(&self, bill_ids: &[BillId]) -> Result<(), BillingError> {
        self.notifier.notify_bills(bill_ids).await?;
        Ok(())
    }

    // ========================================================================
    // Reporting
    // ========================================================================

    /// Aggregates all meals served on `date`
    pub async fn get_daily_consumption(
        &self,
        date: NaiveDate,
    ) -> Result<DailyConsumption, BillingError> {
        let meals = self.meals.get_meal_records().await?;
        Ok(DailyConsumption::from_meals(date, self.currency, &meals)?)
    }

    /// Aggregates the meals one mess served on `date`
    pub async fn get_mess_daily_consumption(
        &self,
        mess_id: &MessId,
        date: NaiveDate,
    ) -> Result<DailyConsumption, BillingError> {
        let meals = self.meals.get_meal_records().await?;
        Ok(DailyConsumption::from_meals(
            date,
            self.currency,
            meals.iter().filter(|m| &m.mess_id == mess_id),
        )?)
    }

    /// Summarizes a student's bills at a mess
    pub async fn student_bill_summary(
        &self,
        mess_id: &MessId,
        student_id: &UserId,
    ) -> Result<StudentBillSummary, BillingError> {
        let bills = self.get_mess_bills(mess_id).await?;
        Ok(StudentBillSummary::from_bills(student_id, &bills, self.currency)?)
    }

    /// Builds the enrollment report of a mess as of `as_of`
    pub async fn enrollment_report(
        &self,
        mess_id: &MessId,
        as_of: NaiveDate,
        filter: &StudentFilter,
    ) -> Result<EnrollmentReport, BillingError> {
        let users = self.users.get_users().await?;
        let bills = self.get_mess_bills(mess_id).await?;
        Ok(EnrollmentReport::build(mess_id, &users, &bills, as_of, filter, self.currency)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use core_kernel::Money;
    use crate::bill::MealType;
    use crate::records::{MealRecord, Mess, User, UserRole};
    use crate::ports::mock::{
        MockBillStore, MockMealLedger, MockMessDirectory, MockUserDirectory, RecordingNotifier,
    };

    fn student(id: &str, mess: &str, enrolled: Option<&str>) -> User {
        User {
            id: UserId::new(id),
            name: format!("Student {}", id),
            email: format!("{}@example.com", id),
            role: UserRole::Student,
            selected_mess_id: Some(MessId::new(mess)),
            enrollment_date: enrolled.map(|d| d.parse().unwrap()),
            student_id: None,
        }
    }

    fn meal(user: &str, mess: &str, date: &str, price: i64) -> MealRecord {
        MealRecord {
            user_id: UserId::new(user),
            mess_id: MessId::new(mess),
            date: date.parse().unwrap(),
            menu_item_name: "Veg Thali".to_string(),
            meal_type: MealType::Lunch,
            price: Money::new(price.into(), Currency::INR),
        }
    }

    struct Fixture {
        engine: BillingEngine,
        store: MockBillStore,
        users: MockUserDirectory,
    }

    fn fixture(users: Vec<User>, meals: Vec<MealRecord>) -> Fixture {
        let store = MockBillStore::new();
        let users = MockUserDirectory::new(users);
        let engine = BillingEngine::new(
            Arc::new(users.clone()),
            Arc::new(MockMealLedger::new(meals)),
            Arc::new(MockMessDirectory::new(vec![Mess {
                id: MessId::new("m1"),
                name: "North Mess".to_string(),
            }])),
            Arc::new(store.clone()),
        );
        Fixture { engine, store, users }
    }

    fn month(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_generation_is_idempotent() {
        let f = fixture(
            vec![student("u1", "m1", None), student("u2", "m1", None)],
            vec![meal("u1", "m1", "2024-04-01", 40), meal("u2", "m1", "2024-04-02", 60)],
        );

        let first = f.engine.generate_bills_for_month(month("2024-04")).await.unwrap();
        let after_first = f.engine.get_all_bills().await.unwrap();
        let second = f.engine.generate_bills_for_month(month("2024-04")).await.unwrap();
        let after_second = f.engine.get_all_bills().await.unwrap();

        assert_eq!(first.generated_count(), 2);
        assert_eq!(second.generated_count(), 0);
        assert_eq!(after_first, after_second);
        assert_eq!(f.store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_enrollment_boundary() {
        let f = fixture(
            vec![student("u1", "m1", Some("2024-03-15"))],
            vec![meal("u1", "m1", "2024-03-20", 40), meal("u1", "m1", "2024-04-02", 60)],
        );

        let march = f.engine.generate_bills_for_month(month("2024-03")).await.unwrap();
        assert_eq!(march.generated_count(), 0);

        let april = f.engine.generate_bills_for_month(month("2024-04")).await.unwrap();
        assert_eq!(april.generated_count(), 1);

        let bills = f.engine.get_user_bills(&UserId::new("u1")).await.unwrap();
        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].month, month("2024-04"));
        assert_eq!(bills[0].total_amount.amount(), dec!(60));
    }

    #[tokio::test]
    async fn test_meals_at_previous_mess_are_excluded() {
        let f = fixture(
            vec![student("u1", "m1", None)],
            vec![meal("u1", "m0", "2024-04-01", 500), meal("u1", "m1", "2024-04-20", 45)],
        );

        f.engine.generate_bills_for_month(month("2024-04")).await.unwrap();

        let bills = f.engine.get_mess_bills(&MessId::new("m1")).await.unwrap();
        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].items.len(), 1);
        assert_eq!(bills[0].total_amount.amount(), dec!(45));
        assert!(f.engine.get_mess_bills(&MessId::new("m0")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_nothing_saved_when_no_bill_generated() {
        let f = fixture(vec![student("u1", "m1", None)], vec![]);

        let report = f.engine.generate_bills_for_month(month("2024-04")).await.unwrap();

        assert_eq!(report.skipped_count(), 1);
        assert_eq!(f.store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_status_update_and_unknown_id() {
        let f = fixture(
            vec![student("u1", "m1", None)],
            vec![meal("u1", "m1", "2024-04-01", 40)],
        );
        let report = f.engine.generate_bills_for_month(month("2024-04")).await.unwrap();
        let bill_id = report.generated_bill_ids()[0];

        assert!(f.engine.update_bill_status(bill_id, BillStatus::Paid).await.unwrap());
        let bill = f.engine.get_bill(bill_id).await.unwrap().unwrap();
        assert_eq!(bill.status, BillStatus::Paid);

        let before = f.engine.get_all_bills().await.unwrap();
        let saves = f.store.save_count();
        let updated = f.engine.update_bill_status(BillId::new_v7(), BillStatus::Paid).await.unwrap();

        assert!(!updated);
        assert_eq!(f.engine.get_all_bills().await.unwrap(), before);
        assert_eq!(f.store.save_count(), saves);
    }

    #[tokio::test]
    async fn test_record_download_increments_counter() {
        let f = fixture(
            vec![student("u1", "m1", None)],
            vec![meal("u1", "m1", "2024-04-01", 40)],
        );
        let report = f.engine.generate_bills_for_month(month("2024-04")).await.unwrap();
        let bill_id = report.generated_bill_ids()[0];

        f.engine.record_bill_download(bill_id).await.unwrap();
        f.engine.record_bill_download(bill_id).await.unwrap();

        let bill = f.engine.get_bill(bill_id).await.unwrap().unwrap();
        assert_eq!(bill.download_count, 2);
        assert!(!f.engine.record_bill_download(BillId::new_v7()).await.unwrap());
    }

    #[tokio::test]
    async fn test_student_switching_mess_keeps_old_bills() {
        let f = fixture(
            vec![student("u1", "m1", None)],
            vec![meal("u1", "m1", "2024-04-01", 40), meal("u1", "m2", "2024-05-01", 55)],
        );
        f.engine.generate_bills_for_month(month("2024-04")).await.unwrap();

        f.users.set_users(vec![student("u1", "m2", None)]).await;
        f.engine.generate_bills_for_month(month("2024-05")).await.unwrap();

        let bills = f.engine.get_user_bills(&UserId::new("u1")).await.unwrap();
        assert_eq!(bills.len(), 2);
        assert_eq!(bills[1].mess_id, MessId::new("m2"));
        assert_eq!(bills[1].mess_name, crate::bill::UNKNOWN_MESS_NAME);
    }

    #[tokio::test]
    async fn test_concurrent_generation_creates_one_bill() {
        let f = fixture(
            vec![student("u1", "m1", None)],
            vec![meal("u1", "m1", "2024-04-01", 40)],
        );
        let engine = Arc::new(f.engine);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let engine = engine.clone();
                tokio::spawn(async move {
                    engine.generate_bills_for_month(month("2024-04")).await.unwrap()
                })
            })
            .collect();
        let mut generated = 0;
        for handle in handles {
            generated += handle.await.unwrap().generated_count();
        }

        assert_eq!(generated, 1);
        assert_eq!(engine.get_all_bills().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_daily_consumption() {
        let f = fixture(
            vec![],
            vec![
                meal("A", "m1", "2024-05-01", 30),
                meal("A", "m1", "2024-05-01", 20),
                meal("B", "m2", "2024-05-01", 40),
            ],
        );
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        let all = f.engine.get_daily_consumption(date).await.unwrap();
        assert_eq!(all.total_amount.amount(), dec!(90));
        assert_eq!(all.meal_count, 3);
        assert_eq!(all.student_count, 2);

        let north = f.engine.get_mess_daily_consumption(&MessId::new("m1"), date).await.unwrap();
        assert_eq!(north.total_amount.amount(), dec!(50));
        assert_eq!(north.student_count, 1);
    }

    #[tokio::test]
    async fn test_notifications_are_forwarded() {
        let f = fixture(vec![], vec![]);
        let notifier = RecordingNotifier::new();
        let engine = f.engine.with_notifier(Arc::new(notifier.clone()));
        let ids = vec![BillId::new_v7(), BillId::new_v7()];

        engine.send_bill_notifications(&ids).await.unwrap();

        assert_eq!(notifier.batches().await, vec![ids]);
    }

    #[tokio::test]
    async fn test_summary_and_enrollment_report() {
        let f = fixture(
            vec![student("u1", "m1", Some("2024-03-15")), student("u2", "m1", Some("2024-04-03"))],
            vec![meal("u1", "m1", "2024-04-01", 100), meal("u1", "m1", "2024-05-01", 50)],
        );
        let april = f.engine.generate_bills_for_month(month("2024-04")).await.unwrap();
        f.engine.generate_bills_for_month(month("2024-05")).await.unwrap();
        f.engine
            .update_bill_status(april.generated_bill_ids()[0], BillStatus::Paid)
            .await
            .unwrap();

        let summary = f.engine
            .student_bill_summary(&MessId::new("m1"), &UserId::new("u1"))
            .await
            .unwrap();
        assert_eq!(summary.total_bills, 2);
        assert_eq!(summary.paid_bills, 1);
        assert_eq!(summary.pending_bills, 1);
        assert_eq!(summary.total_amount.amount(), dec!(150));

        let as_of = NaiveDate::from_ymd_opt(2024, 4, 20).unwrap();
        let report = f.engine
            .enrollment_report(&MessId::new("m1"), as_of, &StudentFilter::default())
            .await
            .unwrap();
        assert_eq!(report.overview.total_students, 2);
        assert_eq!(report.overview.active_students, 1);
        assert_eq!(report.overview.total_bills, 2);
    }
}
