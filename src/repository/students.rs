//! Students repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::student::{NewStudent, Student},
};

use super::books::like_pattern;

#[derive(Clone)]
pub struct StudentsRepository {
    pool: Pool<Postgres>,
}

impl StudentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Students ordered by name, optionally filtered by a name substring
    pub async fn list(&self, q: Option<&str>) -> AppResult<Vec<Student>> {
        let pattern = q
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(like_pattern);

        let students = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, full_name, grade FROM students
            WHERE ($1::text IS NULL OR full_name ILIKE $1)
            ORDER BY full_name
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    pub async fn find(&self, id: i32) -> AppResult<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(
            "SELECT id, full_name, grade FROM students WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(student)
    }

    pub async fn create(&self, student: &NewStudent) -> AppResult<Student> {
        let student = sqlx::query_as::<_, Student>(
            "INSERT INTO students (full_name, grade) VALUES ($1, $2) RETURNING id, full_name, grade",
        )
        .bind(&student.full_name)
        .bind(student.grade)
        .fetch_one(&self.pool)
        .await?;
        Ok(student)
    }
}
