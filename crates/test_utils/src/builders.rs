//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::NaiveDate;
use core_kernel::{MessId, Money, UserId};
use domain_billing::{MealRecord, MealType, User, UserRole};

use crate::fixtures::MoneyFixtures;

/// Builder for directory users
pub struct UserBuilder {
    id: UserId,
    name: String,
    email: String,
    role: UserRole,
    selected_mess_id: Option<MessId>,
    enrollment_date: Option<NaiveDate>,
    student_id: Option<String>,
}

impl UserBuilder {
    fn new(id: UserId, role: UserRole) -> Self {
        Self {
            name: format!("User {}", id),
            email: format!("{}@hostel.edu", id),
            id,
            role,
            selected_mess_id: None,
            enrollment_date: None,
            student_id: None,
        }
    }

    /// A student without mess or enrollment date
    pub fn student(id: UserId) -> Self {
        Self::new(id, UserRole::Student)
    }

    pub fn admin(id: UserId) -> Self {
        Self::new(id, UserRole::Admin)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_mess(mut self, mess_id: MessId) -> Self {
        self.selected_mess_id = Some(mess_id);
        self
    }

    pub fn with_enrollment_date(mut self, date: NaiveDate) -> Self {
        self.enrollment_date = Some(date);
        self
    }

    pub fn with_roll_number(mut self, roll: impl Into<String>) -> Self {
        self.student_id = Some(roll.into());
        self
    }

    pub fn build(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            role: self.role,
            selected_mess_id: self.selected_mess_id,
            enrollment_date: self.enrollment_date,
            student_id: self.student_id,
        }
    }
}

/// Builder for meal records
pub struct MealRecordBuilder {
    user_id: UserId,
    mess_id: MessId,
    date: NaiveDate,
    menu_item_name: String,
    meal_type: MealType,
    price: Money,
}

impl MealRecordBuilder {
    pub fn breakfast(user_id: UserId, mess_id: MessId, date: NaiveDate) -> Self {
        Self {
            user_id,
            mess_id,
            date,
            menu_item_name: "Poha".to_string(),
            meal_type: MealType::Breakfast,
            price: MoneyFixtures::breakfast(),
        }
    }

    pub fn lunch(user_id: UserId, mess_id: MessId, date: NaiveDate) -> Self {
        Self {
            menu_item_name: "Veg Thali".to_string(),
            meal_type: MealType::Lunch,
            price: MoneyFixtures::lunch(),
            ..Self::breakfast(user_id, mess_id, date)
        }
    }

    pub fn dinner(user_id: UserId, mess_id: MessId, date: NaiveDate) -> Self {
        Self {
            menu_item_name: "Rajma Chawal".to_string(),
            meal_type: MealType::Dinner,
            price: MoneyFixtures::dinner(),
            ..Self::breakfast(user_id, mess_id, date)
        }
    }

    pub fn with_item(mut self, name: impl Into<String>) -> Self {
        self.menu_item_name = name.into();
        self
    }

    pub fn with_price(mut self, price: Money) -> Self {
        self.price = price;
        self
    }

    pub fn build(self) -> MealRecord {
        MealRecord {
            user_id: self.user_id,
            mess_id: self.mess_id,
            date: self.date,
            menu_item_name: self.menu_item_name,
            meal_type: self.meal_type,
            price: self.price,
        }
    }
}
