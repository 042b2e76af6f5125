//! Books repository for database operations

use std::collections::HashMap;

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookPayload, BookQuery, BookWithAuthor},
        tag::Tag,
    },
};

/// Wrap a raw search term into an ILIKE pattern, escaping the LIKE
/// metacharacters so they match literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

const BOOK_WITH_AUTHOR: &str = r#"
    SELECT b.id, b.title, b.published_year, b.is_active, b.author_id,
           a.name AS author_name, a.birth_year AS author_birth_year
    FROM books b
    JOIN authors a ON a.id = b.author_id
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Search books by optional title substring and author, ordered by title.
    /// The whole composed view is materialized from this one query.
    pub async fn search(&self, query: &BookQuery) -> AppResult<Vec<BookWithAuthor>> {
        let pattern = query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(like_pattern);

        let books = sqlx::query_as::<_, BookWithAuthor>(&format!(
            r#"{BOOK_WITH_AUTHOR}
            WHERE ($1::text IS NULL OR b.title ILIKE $1)
              AND ($2::int4 IS NULL OR b.author_id = $2)
            ORDER BY b.title ASC
            "#
        ))
        .bind(pattern)
        .bind(query.author)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Get a book joined with its author
    pub async fn get_with_author(&self, id: i32) -> AppResult<BookWithAuthor> {
        sqlx::query_as::<_, BookWithAuthor>(&format!("{BOOK_WITH_AUTHOR} WHERE b.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Find a bare book row
    pub async fn find(&self, id: i32) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, published_year, is_active, author_id FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    pub async fn get(&self, id: i32) -> AppResult<Book> {
        self.find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Load tags for a set of books, keyed by book id, each ordered by name
    pub async fn tags_for_books(&self, book_ids: &[i32]) -> AppResult<HashMap<i32, Vec<Tag>>> {
        let mut by_book: HashMap<i32, Vec<Tag>> = HashMap::new();
        if book_ids.is_empty() {
            return Ok(by_book);
        }

        let rows = sqlx::query(
            r#"
            SELECT bt.book_id, t.id, t.name
            FROM book_tags bt
            JOIN tags t ON t.id = bt.tag_id
            WHERE bt.book_id = ANY($1)
            ORDER BY t.name
            "#,
        )
        .bind(book_ids)
        .fetch_all(&self.pool)
        .await?;

        for row in rows {
            by_book
                .entry(row.get("book_id"))
                .or_default()
                .push(Tag {
                    id: row.get("id"),
                    name: row.get("name"),
                });
        }

        Ok(by_book)
    }

    /// Create a book and its tag links in one transaction
    pub async fn create(&self, payload: &BookPayload) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, published_year, is_active, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, published_year, is_active, author_id
            "#,
        )
        .bind(&payload.title)
        .bind(payload.published_year)
        .bind(payload.is_active)
        .bind(payload.author_id)
        .fetch_one(&mut *tx)
        .await?;

        for tag_id in &payload.tag_ids {
            sqlx::query("INSERT INTO book_tags (book_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
                .bind(book.id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(book)
    }

    /// Update a book in place, replacing its tag set. The id and the loan
    /// history are untouched.
    pub async fn update(&self, id: i32, payload: &BookPayload) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $2, published_year = $3, is_active = $4, author_id = $5
            WHERE id = $1
            RETURNING id, title, published_year, is_active, author_id
            "#,
        )
        .bind(id)
        .bind(&payload.title)
        .bind(payload.published_year)
        .bind(payload.is_active)
        .bind(payload.author_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        sqlx::query("DELETE FROM book_tags WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for tag_id in &payload.tag_ids {
            sqlx::query("INSERT INTO book_tags (book_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
                .bind(id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(book)
    }

    /// Delete a book; its loans and tag links cascade
    pub async fn delete(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            "DELETE FROM books WHERE id = $1 RETURNING id, title, published_year, is_active, author_id",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }
}
