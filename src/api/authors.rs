//! Author maintenance endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        actor::{require, Capability},
        author::{Author, NewAuthor},
    },
};

use super::Actor;

/// Context for the add-author form
#[derive(Serialize, ToSchema)]
pub struct AuthorFormContext {
    /// Existing authors, for duplicate spotting
    pub authors: Vec<Author>,
}

/// Context for the add-author form
#[utoipa::path(
    get,
    path = "/library/author/add/",
    tag = "authors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Existing authors", body = AuthorFormContext),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing capability")
    )
)]
pub async fn author_form(
    State(state): State<crate::AppState>,
    Actor(actor): Actor,
) -> AppResult<Json<AuthorFormContext>> {
    require(&actor, Capability::ManageAuthors)?;

    let authors = state.services.catalog.list_authors().await?;
    Ok(Json(AuthorFormContext { authors }))
}

/// Create a new author
#[utoipa::path(
    post,
    path = "/library/author/add/",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = NewAuthor,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Missing capability")
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    Actor(actor): Actor,
    Json(payload): Json<NewAuthor>,
) -> AppResult<(StatusCode, Json<Author>)> {
    require(&actor, Capability::ManageAuthors)?;

    let author = state.services.catalog.create_author(payload).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Delete an author. Rejected while books still reference them.
#[utoipa::path(
    delete,
    path = "/library/author/{author_id}/",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("author_id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found"),
        (status = 409, description = "Author still owns books")
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    Actor(actor): Actor,
    Path(author_id): Path<i32>,
) -> AppResult<StatusCode> {
    require(&actor, Capability::ManageAuthors)?;

    state.services.catalog.delete_author(author_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
