//! Borrow/return workflow over the loan ledger.
//!
//! Per book the states are Available -> OnLoan -> Available. Borrowing a
//! book that is already out is a deliberate no-op that reports the current
//! state back instead of erroring, and returning twice writes the timestamp
//! exactly once.

use chrono::Utc;

use crate::{
    error::AppResult,
    models::loan::{Loan, OpenLoan},
    repository::Repository,
};

use super::notify::{CatalogEvent, Notifier};

/// What a borrow attempt did
#[derive(Debug, Clone)]
pub enum BorrowOutcome {
    Borrowed(Loan),
    /// The existing open loan was left untouched
    AlreadyOnLoan(Option<OpenLoan>),
    /// Inactive books are excluded from new borrowing
    BookInactive,
    /// An unresolvable borrower saves nothing
    UnknownStudent,
}

/// What a return attempt did
#[derive(Debug, Clone)]
pub enum ReturnOutcome {
    Returned(Loan),
    /// The loan was already closed; no second timestamp is written
    AlreadyReturned(Loan),
}

impl ReturnOutcome {
    pub fn loan(&self) -> &Loan {
        match self {
            ReturnOutcome::Returned(loan) | ReturnOutcome::AlreadyReturned(loan) => loan,
        }
    }
}

#[derive(Clone)]
pub struct CirculationService {
    repository: Repository,
    notifier: Notifier,
}

impl CirculationService {
    pub fn new(repository: Repository, notifier: Notifier) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Borrow a book for a student. The book must exist; every other
    /// precondition failure is a silent no-op reported via the outcome.
    pub async fn borrow(&self, book_id: i32, student_id: i32) -> AppResult<BorrowOutcome> {
        let book = self.repository.books.get(book_id).await?;

        if !book.is_active {
            tracing::debug!(book_id, "Borrow skipped: book inactive");
            return Ok(BorrowOutcome::BookInactive);
        }

        if self.repository.students.find(student_id).await?.is_none() {
            tracing::debug!(book_id, student_id, "Borrow skipped: unknown student");
            return Ok(BorrowOutcome::UnknownStudent);
        }

        match self
            .repository
            .loans
            .insert_open(book_id, student_id, Utc::now())
            .await?
        {
            Some(loan) => {
                self.notifier.emit(&CatalogEvent::LoanCreated {
                    loan: loan.clone(),
                    book_title: book.title,
                });
                Ok(BorrowOutcome::Borrowed(loan))
            }
            None => {
                let current = self.repository.loans.open_for_book(book_id).await?;
                Ok(BorrowOutcome::AlreadyOnLoan(current))
            }
        }
    }

    /// Return a loan. Idempotent: a second call leaves the timestamp alone.
    pub async fn return_loan(&self, loan_id: i32) -> AppResult<ReturnOutcome> {
        let loan = self.repository.loans.get(loan_id).await?;

        if !loan.is_open() {
            return Ok(ReturnOutcome::AlreadyReturned(loan));
        }

        // Snapshot the open state first; the notification carries it
        let prior = self
            .repository
            .loans
            .open_for_book(loan.book_id)
            .await?
            .filter(|open| open.loan_id == loan.id);

        match self
            .repository
            .loans
            .mark_returned(loan_id, Utc::now())
            .await?
        {
            Some(updated) => {
                if let Some(prior) = prior {
                    let book_title = self
                        .repository
                        .books
                        .find(updated.book_id)
                        .await?
                        .map(|b| b.title)
                        .unwrap_or_default();
                    self.notifier.emit(&CatalogEvent::LoanReturned {
                        loan: updated.clone(),
                        prior,
                        book_title,
                    });
                }
                Ok(ReturnOutcome::Returned(updated))
            }
            // Lost a race with a concurrent return
            None => Ok(ReturnOutcome::AlreadyReturned(
                self.repository.loans.get(loan_id).await?,
            )),
        }
    }
}
