//! LocalLibrary catalog server
//!
//! A REST JSON API for a library catalog: books, authors, genres, languages
//! and the individual copies patrons borrow, with permission-gated edits and
//! loan renewals.

use std::sync::Arc;

pub mod admin;
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
