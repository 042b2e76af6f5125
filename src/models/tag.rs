//! Tag model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Tag model from database. Names are unique.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}

/// Create tag request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewTag {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
}

impl NewTag {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self
    }
}
