//! Loans repository for database operations.
//!
//! The one-open-loan-per-book invariant is enforced by a partial unique
//! index on loans(book_id) WHERE returned_at IS NULL; borrow inserts ride
//! on it so the check and the write are a single atomic statement.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        loan::{Loan, OpenLoan},
        student::Student,
    },
};

/// Row shape for open-loan lookups joined with the borrower
#[derive(Debug, FromRow)]
struct OpenLoanRow {
    book_id: i32,
    loan_id: i32,
    borrowed_at: DateTime<Utc>,
    student_id: i32,
    full_name: String,
    grade: Option<i32>,
}

impl From<OpenLoanRow> for OpenLoan {
    fn from(row: OpenLoanRow) -> Self {
        OpenLoan {
            loan_id: row.loan_id,
            student: Student {
                id: row.student_id,
                full_name: row.full_name,
                grade: row.grade,
            },
            borrowed_at: row.borrowed_at,
        }
    }
}

const OPEN_LOAN_SELECT: &str = r#"
    SELECT l.book_id, l.id AS loan_id, l.borrowed_at,
           s.id AS student_id, s.full_name, s.grade
    FROM loans l
    JOIN students s ON s.id = l.student_id
    WHERE l.returned_at IS NULL
"#;

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get(&self, id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>(
            "SELECT id, book_id, student_id, borrowed_at, returned_at FROM loans WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// The open loan for a book, if any. History may hold many returned
    /// loans; the earliest open one is taken, without assuming the invariant.
    pub async fn open_for_book(&self, book_id: i32) -> AppResult<Option<OpenLoan>> {
        let row = sqlx::query_as::<_, OpenLoanRow>(&format!(
            "{OPEN_LOAN_SELECT} AND l.book_id = $1 ORDER BY l.borrowed_at LIMIT 1"
        ))
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(OpenLoan::from))
    }

    /// Open loans for a set of books, keyed by book id, first per book
    pub async fn open_for_books(&self, book_ids: &[i32]) -> AppResult<HashMap<i32, OpenLoan>> {
        let mut by_book: HashMap<i32, OpenLoan> = HashMap::new();
        if book_ids.is_empty() {
            return Ok(by_book);
        }

        let rows = sqlx::query_as::<_, OpenLoanRow>(&format!(
            "{OPEN_LOAN_SELECT} AND l.book_id = ANY($1) ORDER BY l.book_id, l.borrowed_at"
        ))
        .bind(book_ids)
        .fetch_all(&self.pool)
        .await?;

        for row in rows {
            by_book.entry(row.book_id).or_insert_with(|| OpenLoan::from(row));
        }

        Ok(by_book)
    }

    /// Atomically create an open loan unless the book already has one.
    /// Returns None when the insert lost to an existing open loan.
    pub async fn insert_open(
        &self,
        book_id: i32,
        student_id: i32,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (book_id, student_id, borrowed_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (book_id) WHERE returned_at IS NULL DO NOTHING
            RETURNING id, book_id, student_id, borrowed_at, returned_at
            "#,
        )
        .bind(book_id)
        .bind(student_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(loan)
    }

    /// Set returned_at, once. Persists only that field; a loan that is
    /// already returned is left untouched and None comes back.
    pub async fn mark_returned(
        &self,
        loan_id: i32,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans SET returned_at = $2
            WHERE id = $1 AND returned_at IS NULL
            RETURNING id, book_id, student_id, borrowed_at, returned_at
            "#,
        )
        .bind(loan_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(loan)
    }
}
