//! Authors repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, NewAuthor},
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// All authors ordered by name
    pub async fn list(&self) -> AppResult<Vec<Author>> {
        let authors =
            sqlx::query_as::<_, Author>("SELECT id, name, birth_year FROM authors ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(authors)
    }

    pub async fn find(&self, id: i32) -> AppResult<Option<Author>> {
        let author =
            sqlx::query_as::<_, Author>("SELECT id, name, birth_year FROM authors WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(author)
    }

    pub async fn create(&self, author: &NewAuthor) -> AppResult<Author> {
        let author = sqlx::query_as::<_, Author>(
            "INSERT INTO authors (name, birth_year) VALUES ($1, $2) RETURNING id, name, birth_year",
        )
        .bind(&author.name)
        .bind(author.birth_year)
        .fetch_one(&self.pool)
        .await?;
        Ok(author)
    }

    /// Delete an author. Rejected while any book still references them; the
    /// FK is RESTRICT so the store backs the check up under races.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let books: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE author_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        if books > 0 {
            return Err(AppError::Integrity(format!(
                "Author {} still has {} book(s)",
                id, books
            )));
        }

        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.code().as_deref() == Some("23503") => {
                    AppError::Integrity(format!("Author {} is still referenced by books", id))
                }
                _ => AppError::Database(e),
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author with id {} not found", id)));
        }

        Ok(())
    }
}
