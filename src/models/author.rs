//! Author model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub name: String,
    pub birth_year: Option<i32>,
}

/// Create author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewAuthor {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    pub birth_year: Option<i32>,
}

impl NewAuthor {
    /// Trim surrounding whitespace before validation
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self
    }
}
