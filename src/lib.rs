//! Biblos School Library Lending Service
//!
//! A Rust implementation of the Biblos book-lending server, providing a
//! JSON API for browsing the catalog, borrowing and returning books, and
//! maintaining authors, tags, and students.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
