//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the billing domain. The fixtures
//! describe one small hostel: two messes, a handful of students enrolled at
//! different dates, and a few weeks of recorded meals.

use std::sync::Arc;

use chrono::NaiveDate;
use core_kernel::{Currency, MessId, Money, UserId, YearMonth};
use domain_billing::ports::mock::{
    MockBillStore, MockMealLedger, MockMessDirectory, MockUserDirectory,
};
use domain_billing::{BillingEngine, MealRecord, Mess, User};
use rust_decimal_macros::dec;

use crate::builders::{MealRecordBuilder, UserBuilder};

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Price of a breakfast plate
    pub fn breakfast() -> Money {
        Money::new(dec!(30.00), Currency::INR)
    }

    /// Price of a lunch thali
    pub fn lunch() -> Money {
        Money::new(dec!(60.00), Currency::INR)
    }

    /// Price of a dinner thali
    pub fn dinner() -> Money {
        Money::new(dec!(70.00), Currency::INR)
    }

    /// A USD amount for currency mismatch tests
    pub fn usd_5() -> Money {
        Money::new(dec!(5.00), Currency::USD)
    }
}

/// Fixture for calendar test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    pub fn march_2024() -> YearMonth {
        YearMonth::new(2024, 3).unwrap()
    }

    pub fn april_2024() -> YearMonth {
        YearMonth::new(2024, 4).unwrap()
    }

    pub fn may_2024() -> YearMonth {
        YearMonth::new(2024, 5).unwrap()
    }

    /// Mid-month enrollment date; billing starts in April 2024
    pub fn mid_march_enrollment() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }
}

/// Fixture for directory identifiers
pub struct IdFixtures;

impl IdFixtures {
    pub fn north_mess() -> MessId {
        MessId::new("mess-north")
    }

    pub fn south_mess() -> MessId {
        MessId::new("mess-south")
    }

    pub fn asha() -> UserId {
        UserId::new("user-asha")
    }

    pub fn bilal() -> UserId {
        UserId::new("user-bilal")
    }

    pub fn chen() -> UserId {
        UserId::new("user-chen")
    }

    pub fn warden() -> UserId {
        UserId::new("user-warden")
    }
}

/// A small hostel: messes, users and meals
pub struct HostelFixtures;

impl HostelFixtures {
    pub fn messes() -> Vec<Mess> {
        vec![
            Mess {
                id: IdFixtures::north_mess(),
                name: "North Mess".to_string(),
            },
            Mess {
                id: IdFixtures::south_mess(),
                name: "South Mess".to_string(),
            },
        ]
    }

    /// Asha has no enrollment date, Bilal enrolled mid-March at the north
    /// mess, Chen eats at the south mess, and the warden is an admin
    pub fn users() -> Vec<User> {
        vec![
            UserBuilder::student(IdFixtures::asha())
                .with_name("Asha Verma")
                .with_mess(IdFixtures::north_mess())
                .with_roll_number("CS-001")
                .build(),
            UserBuilder::student(IdFixtures::bilal())
                .with_name("Bilal Khan")
                .with_mess(IdFixtures::north_mess())
                .with_enrollment_date(TemporalFixtures::mid_march_enrollment())
                .with_roll_number("ME-014")
                .build(),
            UserBuilder::student(IdFixtures::chen())
                .with_name("Chen Li")
                .with_mess(IdFixtures::south_mess())
                .with_enrollment_date(TemporalFixtures::date(2024, 1, 5))
                .build(),
            UserBuilder::admin(IdFixtures::warden())
                .with_name("Warden")
                .with_mess(IdFixtures::north_mess())
                .build(),
        ]
    }

    /// Meals across March and April 2024
    pub fn meals() -> Vec<MealRecord> {
        let d = TemporalFixtures::date;
        vec![
            MealRecordBuilder::lunch(IdFixtures::asha(), IdFixtures::north_mess(), d(2024, 3, 20)).build(),
            MealRecordBuilder::lunch(IdFixtures::bilal(), IdFixtures::north_mess(), d(2024, 3, 20)).build(),
            MealRecordBuilder::breakfast(IdFixtures::asha(), IdFixtures::north_mess(), d(2024, 4, 1)).build(),
            MealRecordBuilder::lunch(IdFixtures::asha(), IdFixtures::north_mess(), d(2024, 4, 1)).build(),
            MealRecordBuilder::dinner(IdFixtures::bilal(), IdFixtures::north_mess(), d(2024, 4, 2)).build(),
            MealRecordBuilder::lunch(IdFixtures::chen(), IdFixtures::south_mess(), d(2024, 4, 2)).build(),
            MealRecordBuilder::lunch(IdFixtures::warden(), IdFixtures::north_mess(), d(2024, 4, 2)).build(),
        ]
    }
}

/// Mock collaborators wired into an engine, kept so tests can inspect them
pub struct EngineHarness {
    pub engine: BillingEngine,
    pub users: MockUserDirectory,
    pub meals: MockMealLedger,
    pub store: MockBillStore,
}

impl EngineHarness {
    /// Engine over the hostel fixtures with an empty bill store
    pub fn hostel() -> Self {
        Self::with(HostelFixtures::users(), HostelFixtures::meals())
    }

    pub fn with(users: Vec<User>, meals: Vec<MealRecord>) -> Self {
        let users = MockUserDirectory::new(users);
        let meals = MockMealLedger::new(meals);
        let store = MockBillStore::new();
        let engine = BillingEngine::new(
            Arc::new(users.clone()),
            Arc::new(meals.clone()),
            Arc::new(MockMessDirectory::new(HostelFixtures::messes())),
            Arc::new(store.clone()),
        );
        Self {
            engine,
            users,
            meals,
            store,
        }
    }
}
