//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        actor::{require, Capability},
        book::{BookPayload, BookQuery, BookView},
    },
    services::catalog::{BookFormContext, BookListing},
};

use super::Actor;

/// List books with optional title and author filters
#[utoipa::path(
    get,
    path = "/library/",
    tag = "library",
    params(BookQuery),
    responses(
        (status = 200, description = "Books ordered by title, with the author list for filtering", body = BookListing)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<BookListing>> {
    let listing = state.services.catalog.list_books(&query).await?;
    Ok(Json(listing))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/library/{book_id}/",
    tag = "library",
    params(
        ("book_id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book with author, tags, and current loan", body = BookView),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(book_id): Path<i32>,
) -> AppResult<Json<BookView>> {
    let book = state.services.catalog.get_book(book_id).await?;
    Ok(Json(book))
}

/// Context for the add-book form
#[utoipa::path(
    get,
    path = "/library/add/",
    tag = "library",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Authors and tags for the form", body = BookFormContext),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing capability")
    )
)]
pub async fn add_book_form(
    State(state): State<crate::AppState>,
    Actor(actor): Actor,
) -> AppResult<Json<BookFormContext>> {
    require(&actor, Capability::ManageBooks)?;

    let context = state.services.catalog.book_form_context(None).await?;
    Ok(Json(context))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/library/add/",
    tag = "library",
    security(("bearer_auth" = [])),
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book created", body = BookView),
        (status = 400, description = "Validation failed, offending fields listed"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing capability")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    Actor(actor): Actor,
    Json(payload): Json<BookPayload>,
) -> AppResult<(StatusCode, Json<BookView>)> {
    require(&actor, Capability::ManageBooks)?;

    let book = state.services.catalog.create_book(payload).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Context for the edit-book form
#[utoipa::path(
    get,
    path = "/library/{book_id}/edit/",
    tag = "library",
    security(("bearer_auth" = [])),
    params(
        ("book_id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "The book plus authors and tags for the form", body = BookFormContext),
        (status = 404, description = "Book not found")
    )
)]
pub async fn edit_book_form(
    State(state): State<crate::AppState>,
    Actor(actor): Actor,
    Path(book_id): Path<i32>,
) -> AppResult<Json<BookFormContext>> {
    require(&actor, Capability::ManageBooks)?;

    let context = state.services.catalog.book_form_context(Some(book_id)).await?;
    Ok(Json(context))
}

/// Update an existing book. Its id and loan history are preserved.
#[utoipa::path(
    post,
    path = "/library/{book_id}/edit/",
    tag = "library",
    security(("bearer_auth" = [])),
    params(
        ("book_id" = i32, Path, description = "Book ID")
    ),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = BookView),
        (status = 400, description = "Validation failed, offending fields listed"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Actor(actor): Actor,
    Path(book_id): Path<i32>,
    Json(payload): Json<BookPayload>,
) -> AppResult<Json<BookView>> {
    require(&actor, Capability::ManageBooks)?;

    let book = state.services.catalog.update_book(book_id, payload).await?;
    Ok(Json(book))
}

/// Delete a book; its loans go with it
#[utoipa::path(
    delete,
    path = "/library/{book_id}/",
    tag = "library",
    security(("bearer_auth" = [])),
    params(
        ("book_id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Actor(actor): Actor,
    Path(book_id): Path<i32>,
) -> AppResult<StatusCode> {
    require(&actor, Capability::ManageBooks)?;

    state.services.catalog.delete_book(book_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
