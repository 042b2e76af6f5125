//! Catalog management service: composed book views and author/book/tag
//! maintenance.

use std::collections::HashSet;

use chrono::{Datelike, Utc};
use validator::Validate;

use crate::{
    error::{AppError, AppResult, FieldError},
    models::{
        author::{Author, NewAuthor},
        book::{BookPayload, BookQuery, BookView, BookWithAuthor},
        tag::{NewTag, Tag},
    },
    repository::Repository,
};

use super::notify::{CatalogEvent, Notifier};

/// Book listing with the author set for the filter control
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct BookListing {
    pub books: Vec<BookView>,
    pub authors: Vec<Author>,
}

/// Everything the add/edit book forms need
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct BookFormContext {
    pub authors: Vec<Author>,
    pub tags: Vec<Tag>,
    /// Present when editing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book: Option<BookView>,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    notifier: Notifier,
}

impl CatalogService {
    pub fn new(repository: Repository, notifier: Notifier) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// List books matching the query, ordered by title, each carrying its
    /// author, tags, and current open loan.
    pub async fn list_books(&self, query: &BookQuery) -> AppResult<BookListing> {
        let rows = self.repository.books.search(query).await?;
        let books = self.augment(rows).await?;
        let authors = self.repository.authors.list().await?;
        Ok(BookListing { books, authors })
    }

    /// Book detail with the same augmentation as the listing
    pub async fn get_book(&self, id: i32) -> AppResult<BookView> {
        let row = self.repository.books.get_with_author(id).await?;
        let mut views = self.augment(vec![row]).await?;
        Ok(views.remove(0))
    }

    /// Attach tags and open loans to a page of book rows
    async fn augment(&self, rows: Vec<BookWithAuthor>) -> AppResult<Vec<BookView>> {
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let mut tags = self.repository.books.tags_for_books(&ids).await?;
        let mut open_loans = self.repository.loans.open_for_books(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let current_loan = open_loans.remove(&row.id);
                BookView {
                    author: row.author(),
                    tags: tags.remove(&row.id).unwrap_or_default(),
                    available: row.is_active && current_loan.is_none(),
                    current_loan,
                    id: row.id,
                    title: row.title,
                    published_year: row.published_year,
                    is_active: row.is_active,
                }
            })
            .collect())
    }

    /// Context for the add/edit book forms
    pub async fn book_form_context(&self, book_id: Option<i32>) -> AppResult<BookFormContext> {
        let book = match book_id {
            Some(id) => Some(self.get_book(id).await?),
            None => None,
        };
        Ok(BookFormContext {
            authors: self.repository.authors.list().await?,
            tags: self.repository.tags.list().await?,
            book,
        })
    }

    /// Validate a payload end to end: field rules plus referential checks,
    /// all offending fields reported in one shot.
    async fn validate_payload(&self, payload: &BookPayload) -> AppResult<()> {
        let mut fields = payload.field_errors(Utc::now().year());

        if self.repository.authors.find(payload.author_id).await?.is_none() {
            fields.push(FieldError::new("author_id", "Unknown author"));
        }

        let wanted: HashSet<i32> = payload.tag_ids.iter().copied().collect();
        let known = self.repository.tags.get_many(&payload.tag_ids).await?;
        if known.len() != wanted.len() {
            fields.push(FieldError::new("tag_ids", "Unknown tag"));
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(fields))
        }
    }

    pub async fn create_book(&self, payload: BookPayload) -> AppResult<BookView> {
        let payload = payload.normalized();
        self.validate_payload(&payload).await?;

        let book = self.repository.books.create(&payload).await?;
        let view = self.get_book(book.id).await?;
        self.notifier.emit(&CatalogEvent::BookCreated { book });
        Ok(view)
    }

    /// Update in place; the id and loan history survive the edit
    pub async fn update_book(&self, id: i32, payload: BookPayload) -> AppResult<BookView> {
        self.repository.books.get(id).await?;

        let payload = payload.normalized();
        self.validate_payload(&payload).await?;

        let book = self.repository.books.update(id, &payload).await?;
        let view = self.get_book(book.id).await?;
        self.notifier.emit(&CatalogEvent::BookUpdated { book });
        Ok(view)
    }

    /// Delete a book; its loan history goes with it
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        let book = self.repository.books.delete(id).await?;
        self.notifier.emit(&CatalogEvent::BookDeleted { book });
        Ok(())
    }

    pub async fn list_authors(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.list().await
    }

    pub async fn create_author(&self, author: NewAuthor) -> AppResult<Author> {
        let author = author.normalized();
        author.validate().map_err(AppError::from)?;
        self.repository.authors.create(&author).await
    }

    /// Rejected with an integrity error while the author still owns books
    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await
    }

    pub async fn list_tags(&self) -> AppResult<Vec<Tag>> {
        self.repository.tags.list().await
    }

    pub async fn create_tag(&self, tag: NewTag) -> AppResult<Tag> {
        let tag = tag.normalized();
        tag.validate().map_err(AppError::from)?;
        self.repository.tags.create(&tag).await
    }
}
