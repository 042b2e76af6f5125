//! Student roster endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        actor::{require, Capability},
        student::{NewStudent, Student, StudentQuery},
    },
};

use super::Actor;

/// List students, optionally filtered by a name substring. Open because the
/// borrow form on the book detail screen needs the roster.
#[utoipa::path(
    get,
    path = "/students/",
    tag = "students",
    params(StudentQuery),
    responses(
        (status = 200, description = "Students ordered by name", body = Vec<Student>)
    )
)]
pub async fn list_students(
    State(state): State<crate::AppState>,
    Query(query): Query<StudentQuery>,
) -> AppResult<Json<Vec<Student>>> {
    let students = state.services.students.list(query.q.as_deref()).await?;
    Ok(Json(students))
}

/// Register a student
#[utoipa::path(
    post,
    path = "/students/",
    tag = "students",
    security(("bearer_auth" = [])),
    request_body = NewStudent,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Missing capability")
    )
)]
pub async fn create_student(
    State(state): State<crate::AppState>,
    Actor(actor): Actor,
    Json(payload): Json<NewStudent>,
) -> AppResult<(StatusCode, Json<Student>)> {
    require(&actor, Capability::ManageStudents)?;

    let student = state.services.students.create(payload).await?;
    Ok((StatusCode::CREATED, Json(student)))
}
