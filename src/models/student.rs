//! Student (borrower) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Student model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: i32,
    pub full_name: String,
    pub grade: Option<i32>,
}

/// Create student request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewStudent {
    #[validate(length(min = 1, message = "Full name must not be empty"))]
    pub full_name: String,
    pub grade: Option<i32>,
}

impl NewStudent {
    pub fn normalized(mut self) -> Self {
        self.full_name = self.full_name.trim().to_string();
        self
    }
}

/// Student listing query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct StudentQuery {
    /// Case-insensitive name substring
    pub q: Option<String>,
}
