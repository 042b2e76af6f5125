//! Tag maintenance endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::{
        actor::{require, Capability},
        tag::{NewTag, Tag},
    },
};

use super::Actor;

/// List tags ordered by name
#[utoipa::path(
    get,
    path = "/tags/",
    tag = "tags",
    responses(
        (status = 200, description = "All tags", body = Vec<Tag>)
    )
)]
pub async fn list_tags(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Tag>>> {
    let tags = state.services.catalog.list_tags().await?;
    Ok(Json(tags))
}

/// Create a tag; names are unique
#[utoipa::path(
    post,
    path = "/tags/",
    tag = "tags",
    security(("bearer_auth" = [])),
    request_body = NewTag,
    responses(
        (status = 201, description = "Tag created", body = Tag),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Missing capability"),
        (status = 409, description = "Tag name already exists")
    )
)]
pub async fn create_tag(
    State(state): State<crate::AppState>,
    Actor(actor): Actor,
    Json(payload): Json<NewTag>,
) -> AppResult<(StatusCode, Json<Tag>)> {
    require(&actor, Capability::ManageTags)?;

    let tag = state.services.catalog.create_tag(payload).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}
