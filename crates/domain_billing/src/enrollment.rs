//! Enrollment tracking for mess administrators
//!
//! Lists the students of a mess, classifies each one as billing-active or
//! still in the waiting month after enrollment, and attaches their bill
//! summary. Classification uses [`is_billing_active`], the same predicate
//! that gates bill generation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, MessId, MoneyError, UserId, YearMonth};

use crate::bill::Bill;
use crate::eligibility::{billing_start_month, is_billing_active};
use crate::records::User;
use crate::summary::StudentBillSummary;

/// Billing state of an enrolled student on a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    /// Billing has started
    Active,
    /// Still in the month of enrollment
    Waiting,
}

impl EnrollmentStatus {
    pub fn of(user: &User, as_of: NaiveDate) -> Self {
        if is_billing_active(user.enrollment_date, as_of) {
            EnrollmentStatus::Active
        } else {
            EnrollmentStatus::Waiting
        }
    }
}

/// Status filter for the student list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Waiting,
}

impl StatusFilter {
    pub fn accepts(&self, status: EnrollmentStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status == EnrollmentStatus::Active,
            StatusFilter::Waiting => status == EnrollmentStatus::Waiting,
        }
    }
}

/// Search and status filter over a mess's students
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    /// Case-insensitive substring of name, email or roll number
    pub search: Option<String>,
    pub status: StatusFilter,
}

impl StudentFilter {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    fn matches_search(&self, user: &User) -> bool {
        let term = match self.search.as_deref().map(str::trim) {
            None | Some("") => return true,
            Some(term) => term.to_lowercase(),
        };

        user.name.to_lowercase().contains(&term)
            || user.email.to_lowercase().contains(&term)
            || user
                .student_id
                .as_deref()
                .is_some_and(|roll| roll.to_lowercase().contains(&term))
    }

    pub fn matches(&self, user: &User, as_of: NaiveDate) -> bool {
        self.matches_search(user) && self.status.accepts(EnrollmentStatus::of(user, as_of))
    }
}

/// Students of a mess, in directory order
pub fn mess_students<'a>(users: &'a [User], mess_id: &MessId) -> Vec<&'a User> {
    users.iter().filter(|u| u.belongs_to(mess_id)).collect()
}

/// One row of the enrollment list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentEnrollment {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    /// Institution roll number
    pub student_id: Option<String>,
    pub enrollment_date: Option<NaiveDate>,
    pub status: EnrollmentStatus,
    pub billing_starts: Option<YearMonth>,
    pub bills: StudentBillSummary,
}

/// Headline counts for a mess
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentOverview {
    pub mess_id: MessId,
    pub as_of: NaiveDate,
    pub total_students: usize,
    pub active_students: usize,
    pub waiting_students: usize,
    pub total_bills: usize,
}

/// Overview plus the filtered student rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentReport {
    pub overview: EnrollmentOverview,
    pub students: Vec<StudentEnrollment>,
}

impl EnrollmentReport {
    /// Builds the report for `mess_id` as of `as_of`
    ///
    /// The overview counts every student of the mess; only the rows are
    /// subject to `filter`.
    ///
    /// # Arguments
    ///
    /// * `mess_id` - The mess being tracked
    /// * `users` - All users from the user directory
    /// * `mess_bills` - Bills of this mess
    /// * `as_of` - Day the active/waiting classification refers to
    /// * `filter` - Search and status filter for the rows
    /// * `currency` - Currency of the bill summaries
    pub fn build(
        mess_id: &MessId,
        users: &[User],
        mess_bills: &[Bill],
        as_of: NaiveDate,
        filter: &StudentFilter,
        currency: Currency,
    ) -> Result<Self, MoneyError> {
        let students = mess_students(users, mess_id);

        let active_students = students
            .iter()
            .filter(|s| EnrollmentStatus::of(s, as_of) == EnrollmentStatus::Active)
            .count();

        let overview = EnrollmentOverview {
            mess_id: mess_id.clone(),
            as_of,
            total_students: students.len(),
            active_students,
            waiting_students: students.len() - active_students,
            total_bills: mess_bills.len(),
        };

        let rows = students
            .into_iter()
            .filter(|s| filter.matches(s, as_of))
            .map(|s| {
                Ok(StudentEnrollment {
                    user_id: s.id.clone(),
                    name: s.name.clone(),
                    email: s.email.clone(),
                    student_id: s.student_id.clone(),
                    enrollment_date: s.enrollment_date,
                    status: EnrollmentStatus::of(s, as_of),
                    billing_starts: s.enrollment_date.and_then(billing_start_month),
                    bills: StudentBillSummary::from_bills(&s.id, mess_bills, currency)?,
                })
            })
            .collect::<Result<Vec<_>, MoneyError>>()?;

        Ok(Self {
            overview,
            students: rows,
        })
    }
}
