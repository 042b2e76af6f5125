//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{collect_field_errors, AppError, AppResult, FieldError};

use super::author::Author;
use super::loan::OpenLoan;
use super::tag::Tag;

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub published_year: Option<i32>,
    pub is_active: bool,
    pub author_id: i32,
}

/// Book row joined with its author, as produced by the catalog queries
#[derive(Debug, Clone, FromRow)]
pub struct BookWithAuthor {
    pub id: i32,
    pub title: String,
    pub published_year: Option<i32>,
    pub is_active: bool,
    pub author_id: i32,
    pub author_name: String,
    pub author_birth_year: Option<i32>,
}

impl BookWithAuthor {
    pub fn author(&self) -> Author {
        Author {
            id: self.author_id,
            name: self.author_name.clone(),
            birth_year: self.author_birth_year,
        }
    }
}

/// Book with its author, tags, and current open loan for list/detail screens
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookView {
    pub id: i32,
    pub title: String,
    pub published_year: Option<i32>,
    pub is_active: bool,
    pub author: Author,
    pub tags: Vec<Tag>,
    /// The single open loan, when the book is out
    pub current_loan: Option<OpenLoan>,
    /// Active and not on loan
    pub available: bool,
}

/// Book listing query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BookQuery {
    /// Case-insensitive title substring
    pub q: Option<String>,
    /// Filter by author id
    pub author: Option<i32>,
}

fn default_active() -> bool {
    true
}

/// Create/update book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BookPayload {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,
    pub author_id: i32,
    pub published_year: Option<i32>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub tag_ids: Vec<i32>,
}

impl BookPayload {
    /// Trim the title before validation
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self
    }

    /// Field checks against a caller-supplied current year, so the clock
    /// stays out of the rules themselves. Referential checks (author, tags)
    /// are layered on by the catalog service.
    pub fn field_errors(&self, current_year: i32) -> Vec<FieldError> {
        let mut fields = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => collect_field_errors(&errors),
        };
        if let Some(year) = self.published_year {
            if year > current_year {
                fields.push(FieldError::new(
                    "published_year",
                    format!("Published year must not be after {}", current_year),
                ));
            }
        }
        fields
    }

    pub fn validate_for(&self, current_year: i32) -> AppResult<()> {
        let fields = self.field_errors(current_year);
        if fields.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(fields))
        }
    }
}
