//! Language model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Language of a book's original version or of a single copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Language {
    pub id: i32,
    pub name: String,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Create or update language request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LanguageForm {
    #[validate(length(min = 1, max = 40, message = "Language must be 1-40 characters"))]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let language = Language { id: 3, name: "Chinese".to_string() };
        assert_eq!(language.to_string(), "Chinese");
    }

    #[test]
    fn test_form_length() {
        assert!(LanguageForm { name: "x".repeat(41) }.validate().is_err());
        assert!(LanguageForm { name: "French".to_string() }.validate().is_ok());
    }
}
