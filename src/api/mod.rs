//! API handlers for Biblos HTTP endpoints

pub mod authors;
pub mod books;
pub mod health;
pub mod loans;
pub mod openapi;
pub mod students;
pub mod tags;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::AppError, models::actor::ActorClaims, AppState};

/// Extractor for the authenticated actor from a Bearer JWT
pub struct Actor(pub ActorClaims);

#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Get the Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        // Check for Bearer token
        if !auth_header.starts_with("Bearer ") {
            return Err(AppError::Authentication(
                "Invalid authorization header format".to_string(),
            ));
        }

        let token = &auth_header[7..];

        // Validate JWT token using the secret from configuration
        let claims = ActorClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(Actor(claims))
    }
}

/// Service-wide maintenance gate. Health stays reachable for probes.
pub async fn maintenance_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if state.config.server.maintenance_mode
        && !matches!(request.uri().path(), "/health" | "/ready")
    {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            "Service temporarily unavailable for maintenance",
        )
            .into_response();
    }
    next.run(request).await
}
