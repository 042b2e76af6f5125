//! Borrow and return endpoints.
//!
//! Only POST mutates; a GET against either path just redirects. POST
//! redirects to the relevant detail view whatever the outcome, like the
//! form flow it fronts.

use axum::{
    extract::{Path, State},
    response::Redirect,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{error::AppResult, services::circulation::BorrowOutcome};

/// Borrow request: the student taking the book
#[derive(Debug, Deserialize, ToSchema)]
pub struct BorrowRequest {
    pub student_id: i32,
}

fn book_detail(book_id: i32) -> Redirect {
    Redirect::to(&format!("/library/{}/", book_id))
}

/// Borrow a book for a student
#[utoipa::path(
    post,
    path = "/book/{book_id}/borrow/",
    tag = "loans",
    params(
        ("book_id" = i32, Path, description = "Book ID")
    ),
    request_body = BorrowRequest,
    responses(
        (status = 303, description = "Redirects to the book detail view regardless of outcome"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    Path(book_id): Path<i32>,
    Json(request): Json<BorrowRequest>,
) -> AppResult<Redirect> {
    let outcome = state
        .services
        .circulation
        .borrow(book_id, request.student_id)
        .await?;

    if let BorrowOutcome::AlreadyOnLoan(_) = outcome {
        // Deliberately silent: the detail view shows the current loan
        tracing::debug!(book_id, "Borrow attempt on a book already on loan");
    }

    Ok(book_detail(book_id))
}

/// Read-only requests never mutate; send the caller to the detail view
#[utoipa::path(
    get,
    path = "/book/{book_id}/borrow/",
    tag = "loans",
    params(
        ("book_id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 303, description = "Redirects to the book detail view")
    )
)]
pub async fn borrow_book_redirect(Path(book_id): Path<i32>) -> Redirect {
    book_detail(book_id)
}

/// Return a loan; a second return is a no-op
#[utoipa::path(
    post,
    path = "/loans/{loan_id}/return/",
    tag = "loans",
    params(
        ("loan_id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 303, description = "Redirects to the book detail view"),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    Path(loan_id): Path<i32>,
) -> AppResult<Redirect> {
    let outcome = state.services.circulation.return_loan(loan_id).await?;
    Ok(book_detail(outcome.loan().book_id))
}

/// Read-only requests never mutate; send the caller to the listing
#[utoipa::path(
    get,
    path = "/loans/{loan_id}/return/",
    tag = "loans",
    params(
        ("loan_id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 303, description = "Redirects to the book listing")
    )
)]
pub async fn return_loan_redirect() -> Redirect {
    Redirect::to("/library/")
}
