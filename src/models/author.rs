//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use super::{book::Book, clean_date};

/// Full author model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// Canonical location of this author's detail view
    pub fn url(&self) -> String {
        format!("/catalog/author/{}", self.id)
    }
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.last_name, self.first_name)
    }
}

/// Author with the books attributed to them
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorDetail {
    #[serde(flatten)]
    pub author: Author,
    pub url: String,
    pub books: Vec<Book>,
}

impl AuthorDetail {
    pub fn new(author: Author, books: Vec<Book>) -> Self {
        let url = author.url();
        Self { author, url, books }
    }
}

/// Create or update author request.
///
/// Dates arrive as text so that unparseable values are reported per field.
#[serde_as]
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AuthorForm {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub date_of_death: Option<String>,
}

/// Author fields after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorInput {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl AuthorForm {
    pub fn clean(&self) -> Result<AuthorInput, ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_default();
        let date_of_birth = clean_date("date_of_birth", self.date_of_birth.as_deref(), &mut errors);
        let date_of_death = clean_date("date_of_death", self.date_of_death.as_deref(), &mut errors);

        if !errors.errors().is_empty() {
            return Err(errors);
        }

        Ok(AuthorInput {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            date_of_birth,
            date_of_death,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(dob: Option<&str>, dod: Option<&str>) -> AuthorForm {
        AuthorForm {
            first_name: "John".to_string(),
            last_name: "Smith".to_string(),
            date_of_birth: dob.map(String::from),
            date_of_death: dod.map(String::from),
        }
    }

    #[test]
    fn test_display_and_url() {
        let author = Author {
            id: 1,
            first_name: "Big".to_string(),
            last_name: "Bob".to_string(),
            date_of_birth: None,
            date_of_death: None,
        };
        assert_eq!(author.to_string(), "Bob, Big");
        assert_eq!(author.url(), "/catalog/author/1");
    }

    #[test]
    fn test_clean_valid_dates() {
        let input = form(Some("1932-05-17"), Some("2007-11-23")).clean().unwrap();
        assert_eq!(input.date_of_birth, NaiveDate::from_ymd_opt(1932, 5, 17));
        assert_eq!(input.date_of_death, NaiveDate::from_ymd_opt(2007, 11, 23));
    }

    #[test]
    fn test_blank_dates_deserialize_as_none() {
        let form: AuthorForm = serde_json::from_value(serde_json::json!({
            "first_name": "John",
            "last_name": "Smith",
            "date_of_birth": "",
        }))
        .unwrap();
        assert_eq!(form.date_of_birth, None);
        assert_eq!(form.date_of_death, None);

        let input = form.clean().unwrap();
        assert_eq!(input.date_of_birth, None);
        assert_eq!(input.date_of_death, None);
    }

    #[test]
    fn test_clean_two_digit_year() {
        let input = form(Some("11/02/26"), None).clean().unwrap();
        assert_eq!(input.date_of_birth, NaiveDate::from_ymd_opt(2026, 11, 2));
    }

    #[test]
    fn test_clean_invalid_dates() {
        let errors = form(Some("a long time ago"), Some("not yet")).clean().unwrap_err();
        let fields = crate::error::field_messages(&errors);
        assert_eq!(fields["date_of_birth"], vec!["Enter a valid date."]);
        assert_eq!(fields["date_of_death"], vec!["Enter a valid date."]);
    }

    #[test]
    fn test_clean_missing_last_name() {
        let mut bad = form(None, None);
        bad.last_name = String::new();
        let errors = bad.clean().unwrap_err();
        assert!(errors.field_errors().contains_key("last_name"));
    }
}
