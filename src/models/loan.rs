//! Loan (borrow) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::student::Student;

/// Loan model from database. Open while `returned_at` is null.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub book_id: i32,
    pub student_id: i32,
    pub borrowed_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl Loan {
    pub fn is_open(&self) -> bool {
        self.returned_at.is_none()
    }
}

/// Open loan joined with its borrower, as shown on list/detail screens
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OpenLoan {
    pub loan_id: i32,
    pub student: Student,
    pub borrowed_at: DateTime<Utc>,
}
