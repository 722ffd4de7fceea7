//! Integration tests for domain_billing

use rust_decimal_macros::dec;
use proptest::prelude::*;

use core_kernel::{Currency, MessId, YearMonth};
use domain_billing::{
    BillStatus, EnrollmentStatus, GenerationOutcome, StatusFilter, StudentFilter,
};
use domain_billing::generation::generate_month;
use domain_billing::ports::BillStore;
use test_utils::{
    assert_bill_status, assert_bill_total_consistent, assert_items_within_month,
    assert_money_eq, assert_unique_per_student_month, monthly_meals_strategy,
    student_strategy, year_month_strategy, EngineHarness, IdFixtures, MealRecordBuilder,
    MoneyFixtures, TemporalFixtures, UserBuilder,
};

// ============================================================================
// Generation Tests
// ============================================================================

mod generation_tests {
    use super::*;

    #[tokio::test]
    async fn test_march_skips_student_enrolled_mid_march() {
        let h = EngineHarness::hostel();

        let report = h
            .engine
            .generate_bills_for_month(TemporalFixtures::march_2024())
            .await
            .unwrap();

        assert!(report.outcome_for(&IdFixtures::asha()).unwrap().is_generated());
        assert_eq!(
            report.outcome_for(&IdFixtures::bilal()),
            Some(&GenerationOutcome::SkippedIneligible {
                billing_starts: Some(TemporalFixtures::april_2024()),
            })
        );
        assert_eq!(
            report.outcome_for(&IdFixtures::chen()),
            Some(&GenerationOutcome::SkippedNoMeals)
        );
        assert!(report.outcome_for(&IdFixtures::warden()).is_none());
    }

    #[tokio::test]
    async fn test_april_bills_every_eligible_student() {
        let h = EngineHarness::hostel();

        let report = h
            .engine
            .generate_bills_for_month(TemporalFixtures::april_2024())
            .await
            .unwrap();
        assert_eq!(report.generated_count(), 3);

        let bills = h.engine.get_all_bills().await.unwrap();
        assert_unique_per_student_month(&bills);
        for bill in &bills {
            assert_bill_total_consistent(bill);
            assert_items_within_month(bill);
            assert_bill_status(bill, BillStatus::Pending);
        }

        let asha = h.engine.get_user_bills(&IdFixtures::asha()).await.unwrap();
        assert_eq!(asha.len(), 1);
        assert_eq!(asha[0].mess_name, "North Mess");
        assert_money_eq(&asha[0].total_amount, dec!(90));

        let south = h.engine.get_mess_bills(&IdFixtures::south_mess()).await.unwrap();
        assert_eq!(south.len(), 1);
        assert_eq!(south[0].student_id, IdFixtures::chen());
    }

    #[tokio::test]
    async fn test_regeneration_adds_late_students_only() {
        let h = EngineHarness::hostel();
        let april = TemporalFixtures::april_2024();
        h.engine.generate_bills_for_month(april).await.unwrap();
        let saves = h.store.save_count();

        h.meals
            .record(
                MealRecordBuilder::lunch(
                    IdFixtures::chen(),
                    IdFixtures::south_mess(),
                    TemporalFixtures::date(2024, 4, 28),
                )
                .build(),
            )
            .await;
        let again = h.engine.generate_bills_for_month(april).await.unwrap();

        assert_eq!(again.generated_count(), 0);
        assert_eq!(h.store.save_count(), saves);
        let chen = h.engine.get_user_bills(&IdFixtures::chen()).await.unwrap();
        assert_eq!(chen[0].items.len(), 1);
    }

    #[tokio::test]
    async fn test_mixed_currency_meals_persist_nothing() {
        let h = EngineHarness::hostel();
        h.meals
            .record(
                MealRecordBuilder::lunch(
                    IdFixtures::asha(),
                    IdFixtures::north_mess(),
                    TemporalFixtures::date(2024, 4, 3),
                )
                .with_price(MoneyFixtures::usd_5())
                .build(),
            )
            .await;

        let result = h
            .engine
            .generate_bills_for_month(TemporalFixtures::april_2024())
            .await;

        assert!(result.is_err());
        assert_eq!(h.store.save_count(), 0);
        assert!(h.store.load_bills().await.unwrap().is_empty());
    }
}

// ============================================================================
// Status and Download Tests
// ============================================================================

mod status_tests {
    use super::*;
    use core_kernel::BillId;

    #[tokio::test]
    async fn test_mark_paid_then_pending() {
        let h = EngineHarness::hostel();
        let report = h
            .engine
            .generate_bills_for_month(TemporalFixtures::april_2024())
            .await
            .unwrap();
        let bill_id = report.generated_bill_ids()[0];

        assert!(h.engine.update_bill_status(bill_id, BillStatus::Paid).await.unwrap());
        let bill = h.engine.get_bill(bill_id).await.unwrap().unwrap();
        assert_bill_status(&bill, BillStatus::Paid);

        assert!(h.engine.update_bill_status(bill_id, BillStatus::Pending).await.unwrap());
        let bill = h.engine.get_bill(bill_id).await.unwrap().unwrap();
        assert_bill_status(&bill, BillStatus::Pending);
    }

    #[tokio::test]
    async fn test_downloads_are_counted_per_bill() {
        let h = EngineHarness::hostel();
        let report = h
            .engine
            .generate_bills_for_month(TemporalFixtures::april_2024())
            .await
            .unwrap();
        let ids = report.generated_bill_ids();

        for _ in 0..3 {
            h.engine.record_bill_download(ids[0]).await.unwrap();
        }

        assert_eq!(h.engine.get_bill(ids[0]).await.unwrap().unwrap().download_count, 3);
        assert_eq!(h.engine.get_bill(ids[1]).await.unwrap().unwrap().download_count, 0);
    }

    #[tokio::test]
    async fn test_unknown_bill_is_reported_not_created() {
        let h = EngineHarness::hostel();

        assert!(!h.engine.update_bill_status(BillId::new_v7(), BillStatus::Paid).await.unwrap());
        assert!(h.engine.get_bill(BillId::new_v7()).await.unwrap().is_none());
        assert_eq!(h.store.save_count(), 0);
    }
}

// ============================================================================
// Reporting Tests
// ============================================================================

mod reporting_tests {
    use super::*;

    #[tokio::test]
    async fn test_daily_consumption_counts_distinct_students() {
        let h = EngineHarness::hostel();
        let day = TemporalFixtures::date(2024, 4, 2);

        let all = h.engine.get_daily_consumption(day).await.unwrap();
        assert_eq!(all.meal_count, 3);
        assert_eq!(all.student_count, 3);
        assert_money_eq(&all.total_amount, dec!(190));

        let north = h
            .engine
            .get_mess_daily_consumption(&IdFixtures::north_mess(), day)
            .await
            .unwrap();
        assert_eq!(north.meal_count, 2);
        assert_money_eq(&north.total_amount, dec!(130));
    }

    #[tokio::test]
    async fn test_empty_day_is_zero() {
        let h = EngineHarness::hostel();
        let summary = h
            .engine
            .get_daily_consumption(TemporalFixtures::date(2024, 6, 1))
            .await
            .unwrap();

        assert!(summary.total_amount.is_zero());
        assert_eq!(summary.meal_count, 0);
        assert_eq!(summary.student_count, 0);
    }

    #[tokio::test]
    async fn test_enrollment_report_for_north_mess() {
        let h = EngineHarness::hostel();
        h.engine
            .generate_bills_for_month(TemporalFixtures::april_2024())
            .await
            .unwrap();
        let march_28 = TemporalFixtures::date(2024, 3, 28);

        let report = h
            .engine
            .enrollment_report(&IdFixtures::north_mess(), march_28, &StudentFilter::default())
            .await
            .unwrap();
        assert_eq!(report.overview.total_students, 2);
        assert_eq!(report.overview.active_students, 1);
        assert_eq!(report.overview.waiting_students, 1);
        assert_eq!(report.overview.total_bills, 2);

        let waiting = h
            .engine
            .enrollment_report(
                &IdFixtures::north_mess(),
                march_28,
                &StudentFilter::search("khan").with_status(StatusFilter::Waiting),
            )
            .await
            .unwrap();
        assert_eq!(waiting.students.len(), 1);
        assert_eq!(waiting.students[0].status, EnrollmentStatus::Waiting);
        assert_eq!(waiting.students[0].billing_starts, Some(TemporalFixtures::april_2024()));
        assert_eq!(waiting.students[0].bills.total_bills, 1);
    }

    #[tokio::test]
    async fn test_student_switching_mess_changes_enrollment_lists() {
        let h = EngineHarness::hostel();
        let mut users = test_utils::HostelFixtures::users();
        users[0] = UserBuilder::student(IdFixtures::asha())
            .with_name("Asha Verma")
            .with_mess(IdFixtures::south_mess())
            .build();
        h.users.set_users(users).await;

        let today = TemporalFixtures::date(2024, 4, 20);
        let north = h
            .engine
            .enrollment_report(&IdFixtures::north_mess(), today, &StudentFilter::default())
            .await
            .unwrap();
        let south = h
            .engine
            .enrollment_report(&IdFixtures::south_mess(), today, &StudentFilter::default())
            .await
            .unwrap();

        assert_eq!(north.overview.total_students, 1);
        assert_eq!(south.overview.total_students, 2);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

fn single_student_month() -> impl Strategy<Value = (YearMonth, domain_billing::User, Vec<domain_billing::MealRecord>)> {
    (year_month_strategy(), student_strategy(MessId::new("mess-north"))).prop_flat_map(
        |(month, student)| {
            let meals =
                monthly_meals_strategy(student.id.clone(), MessId::new("mess-north"), month);
            (Just(month), Just(student), meals)
        },
    )
}

proptest! {
    #[test]
    fn generated_totals_match_meals((month, student, meals) in single_student_month()) {
        let mut bills = Vec::new();
        let users = vec![student.clone()];
        let report = generate_month(
            month, &users, &meals, &mut bills, |_| None, Currency::INR, chrono::Utc::now(),
        ).unwrap();

        let eligible = domain_billing::is_billable_for(student.enrollment_date, month);
        prop_assert_eq!(report.generated_count(), usize::from(eligible && !meals.is_empty()));
        for bill in &bills {
            prop_assert_eq!(bill.items.len(), meals.len());
            assert_bill_total_consistent(bill);
        }

        let again = generate_month(
            month, &users, &meals, &mut bills, |_| None, Currency::INR, chrono::Utc::now(),
        ).unwrap();
        prop_assert_eq!(again.generated_count(), 0);
        prop_assert!(bills.len() <= 1);
    }

    #[test]
    fn bills_never_precede_enrollment(
        month in year_month_strategy(),
        enrolled in test_utils::date_strategy(),
    ) {
        let mess = MessId::new("mess-north");
        let student = UserBuilder::student(IdFixtures::asha())
            .with_mess(mess.clone())
            .with_enrollment_date(enrolled)
            .build();
        let meal = MealRecordBuilder::lunch(
            student.id.clone(),
            mess,
            chrono::NaiveDate::from_ymd_opt(month.year(), month.month(), 10).unwrap(),
        )
        .build();

        let mut bills = Vec::new();
        generate_month(
            month, &[student], &[meal], &mut bills, |_| None, Currency::INR, chrono::Utc::now(),
        ).unwrap();

        if let Some(bill) = bills.first() {
            prop_assert!(bill.month > YearMonth::from_date(enrolled));
        }
    }
}
