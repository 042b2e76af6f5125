//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, health, loans, students, tags};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblos API",
        version = "1.0.0",
        description = "School Library Lending Service JSON API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "Biblos Team", email = "contact@biblos.org")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Library
        books::list_books,
        books::get_book,
        books::add_book_form,
        books::create_book,
        books::edit_book_form,
        books::update_book,
        books::delete_book,
        // Loans
        loans::borrow_book,
        loans::borrow_book_redirect,
        loans::return_loan,
        loans::return_loan_redirect,
        // Authors
        authors::author_form,
        authors::create_author,
        authors::delete_author,
        // Tags
        tags::list_tags,
        tags::create_tag,
        // Students
        students::list_students,
        students::create_student,
    ),
    components(
        schemas(
            // Library
            crate::models::book::Book,
            crate::models::book::BookView,
            crate::models::book::BookPayload,
            crate::models::author::Author,
            crate::models::author::NewAuthor,
            crate::models::tag::Tag,
            crate::models::tag::NewTag,
            crate::models::student::Student,
            crate::models::student::NewStudent,
            crate::services::catalog::BookListing,
            crate::services::catalog::BookFormContext,
            authors::AuthorFormContext,
            // Loans
            crate::models::loan::Loan,
            crate::models::loan::OpenLoan,
            loans::BorrowRequest,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
            crate::error::FieldError,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "library", description = "Book catalog browsing and maintenance"),
        (name = "loans", description = "Borrow and return workflow"),
        (name = "authors", description = "Author maintenance"),
        (name = "tags", description = "Tag maintenance"),
        (name = "students", description = "Student roster")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
