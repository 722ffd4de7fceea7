//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use chrono::{Datelike, NaiveDate};
use core_kernel::{Currency, MessId, Money, UserId, YearMonth};
use domain_billing::{MealRecord, MealType, User, UserRole};
use proptest::prelude::*;

/// Strategy for supported currencies
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::INR),
        Just(Currency::USD),
        Just(Currency::EUR),
        Just(Currency::GBP),
        Just(Currency::BDT),
        Just(Currency::NPR),
        Just(Currency::LKR),
    ]
}

/// Strategy for meal prices in INR, 10.00 to 250.00
pub fn meal_price_strategy() -> impl Strategy<Value = Money> {
    (1_000i64..25_000i64).prop_map(|minor| Money::from_minor(minor, Currency::INR))
}

/// Strategy for calendar dates between 2020 and 2030
pub fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2020i32..2030i32, 1u32..=12u32, 1u32..=28u32)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// Strategy for billing months between 2020 and 2030
pub fn year_month_strategy() -> impl Strategy<Value = YearMonth> {
    date_strategy().prop_map(YearMonth::from_date)
}

/// Strategy for dates inside a given month
pub fn date_in_month_strategy(month: YearMonth) -> impl Strategy<Value = NaiveDate> {
    (1u32..=28u32).prop_map(move |day| {
        NaiveDate::from_ymd_opt(month.year(), month.month(), day).unwrap()
    })
}

/// Strategy for meal slots
pub fn meal_type_strategy() -> impl Strategy<Value = MealType> {
    prop_oneof![
        Just(MealType::Breakfast),
        Just(MealType::Lunch),
        Just(MealType::Snacks),
        Just(MealType::Dinner),
    ]
}

/// Strategy for students of `mess_id`, enrolled or not
pub fn student_strategy(mess_id: MessId) -> impl Strategy<Value = User> {
    ("[a-z]{4,10}", proptest::option::of(date_strategy())).prop_map(move |(name, enrolled)| User {
        id: UserId::new(format!("user-{}", name)),
        email: format!("{}@hostel.edu", name),
        name,
        role: UserRole::Student,
        selected_mess_id: Some(mess_id.clone()),
        enrollment_date: enrolled,
        student_id: None,
    })
}

/// Strategy for a month of meals for one student at one mess
pub fn monthly_meals_strategy(
    user_id: UserId,
    mess_id: MessId,
    month: YearMonth,
) -> impl Strategy<Value = Vec<MealRecord>> {
    proptest::collection::vec(
        (date_in_month_strategy(month), meal_type_strategy(), meal_price_strategy()),
        0..60,
    )
    .prop_map(move |entries| {
        entries
            .into_iter()
            .map(|(date, meal_type, price)| MealRecord {
                user_id: user_id.clone(),
                mess_id: mess_id.clone(),
                date,
                menu_item_name: format!("{:?} on day {}", meal_type, date.day()),
                meal_type,
                price,
            })
            .collect()
    })
}
