//! Genre model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book genre (e.g. Science Fiction)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Create or update genre request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GenreForm {
    /// Enter a book genre (e.g. Science Fiction)
    #[validate(length(min = 1, max = 200, message = "Genre must be 1-200 characters"))]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let genre = Genre { id: 1, name: "Fantasy".to_string() };
        assert_eq!(genre.to_string(), "Fantasy");
    }

    #[test]
    fn test_form_rejects_empty_name() {
        assert!(GenreForm { name: String::new() }.validate().is_err());
        assert!(GenreForm { name: "x".repeat(201) }.validate().is_err());
        assert!(GenreForm { name: "Poems".to_string() }.validate().is_ok());
    }
}
