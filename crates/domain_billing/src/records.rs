//! Records owned by the external directories
//!
//! Users, meal records and messes are read-only to the billing domain. They
//! are produced by the user directory, the meal ledger and the mess
//! directory and only consumed here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::temporal::optional_calendar_date;
use core_kernel::{MessId, Money, UserId};

use crate::bill::MealType;

/// Account role as recorded by the user directory
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Admin,
    /// Any other role label; carried through but never billed
    #[serde(untagged)]
    Other(String),
}

/// A registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    /// Mess the user currently eats at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_mess_id: Option<MessId>,
    /// Date the user joined their current mess
    #[serde(
        default,
        with = "optional_calendar_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub enrollment_date: Option<NaiveDate>,
    /// Institution roll number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
}

impl User {
    pub fn is_student(&self) -> bool {
        self.role == UserRole::Student
    }

    /// The user's mess, if one is selected and the key is non-empty
    pub fn mess(&self) -> Option<&MessId> {
        self.selected_mess_id.as_ref().filter(|id| !id.is_empty())
    }

    /// Returns true if this user takes part in monthly billing at all:
    /// a student with a mess selected
    pub fn is_billable_student(&self) -> bool {
        self.is_student() && self.mess().is_some()
    }

    /// Returns true if the user is a student of the given mess
    pub fn belongs_to(&self, mess_id: &MessId) -> bool {
        self.is_student() && self.mess() == Some(mess_id)
    }
}

/// One recorded meal consumption event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealRecord {
    pub user_id: UserId,
    pub mess_id: MessId,
    pub date: NaiveDate,
    pub menu_item_name: String,
    pub meal_type: MealType,
    pub price: Money,
}

/// A mess as listed by the mess directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mess {
    pub id: MessId,
    pub name: String,
}
