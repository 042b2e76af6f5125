//! Notification hooks fired after persistence.
//!
//! Subscribers form an explicit list handed to the notifier at startup, so
//! tests can inject their own. Dispatch is synchronous and best-effort: the
//! write has already committed by the time an event fires, and a subscriber
//! failure never propagates to the caller.

use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

use crate::models::{
    book::Book,
    loan::{Loan, OpenLoan},
};

/// Events observed after a successful write
#[derive(Debug, Clone)]
pub enum CatalogEvent {
    BookCreated { book: Book },
    BookUpdated { book: Book },
    BookDeleted { book: Book },
    LoanCreated { loan: Loan, book_title: String },
    /// Carries the open-loan state as it was before the return
    LoanReturned {
        loan: Loan,
        prior: OpenLoan,
        book_title: String,
    },
}

#[cfg_attr(test, automock)]
pub trait Subscriber: Send + Sync {
    fn notify(&self, event: &CatalogEvent) -> anyhow::Result<()>;
}

/// Explicit subscriber list; `emit` never fails the surrounding operation
#[derive(Clone, Default)]
pub struct Notifier {
    subscribers: Vec<Arc<dyn Subscriber>>,
}

impl Notifier {
    pub fn new(subscribers: Vec<Arc<dyn Subscriber>>) -> Self {
        Self { subscribers }
    }

    pub fn emit(&self, event: &CatalogEvent) {
        for subscriber in &self.subscribers {
            if let Err(err) = subscriber.notify(event) {
                tracing::warn!("Notification subscriber failed: {:#}", err);
            }
        }
    }
}

/// Default subscriber logging every event through tracing
pub struct LogSubscriber;

impl Subscriber for LogSubscriber {
    fn notify(&self, event: &CatalogEvent) -> anyhow::Result<()> {
        match event {
            CatalogEvent::BookCreated { book } => {
                tracing::info!(book_id = book.id, title = %book.title, "Book created");
            }
            CatalogEvent::BookUpdated { book } => {
                tracing::info!(book_id = book.id, title = %book.title, "Book updated");
            }
            CatalogEvent::BookDeleted { book } => {
                tracing::info!(book_id = book.id, title = %book.title, "Book deleted");
            }
            CatalogEvent::LoanCreated { loan, book_title } => {
                tracing::info!(
                    loan_id = loan.id,
                    book_id = loan.book_id,
                    student_id = loan.student_id,
                    title = %book_title,
                    "Loan created"
                );
            }
            CatalogEvent::LoanReturned {
                loan,
                prior,
                book_title,
            } => {
                tracing::info!(
                    loan_id = loan.id,
                    book_id = loan.book_id,
                    student = %prior.student.full_name,
                    borrowed_at = %prior.borrowed_at,
                    title = %book_title,
                    "Loan returned"
                );
            }
        }
        Ok(())
    }
}
