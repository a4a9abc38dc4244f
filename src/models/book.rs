//! Book model (a title, not a specific copy)

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{book_instance::BookInstance, genre::Genre};

/// Full book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: Option<i32>,
    pub summary: String,
    pub isbn: String,
    pub language_id: Option<i32>,
    // Computed fields (populated when queried with JOINs, None otherwise)
    #[sqlx(default)]
    #[serde(default)]
    pub author_name: Option<String>,
    #[sqlx(default)]
    #[serde(default)]
    pub language_name: Option<String>,
    #[sqlx(skip)]
    #[serde(default)]
    pub genres: Vec<Genre>,
}

impl Book {
    /// Canonical location of this book's detail view
    pub fn url(&self) -> String {
        format!("/catalog/book/{}", self.id)
    }

    /// Names of the first three genres, comma separated
    pub fn display_genre(&self) -> String {
        self.genres
            .iter()
            .take(3)
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Book with its copies
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetail {
    #[serde(flatten)]
    pub book: Book,
    pub url: String,
    pub instances: Vec<BookInstance>,
}

impl BookDetail {
    pub fn new(book: Book, instances: Vec<BookInstance>) -> Self {
        let url = book.url();
        Self { book, url, instances }
    }
}

/// Create or update book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BookForm {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    pub author_id: Option<i32>,
    /// Enter a brief description of the book
    #[validate(length(min = 1, max = 1000, message = "Summary must be 1-1000 characters"))]
    pub summary: String,
    /// 13 character ISBN number
    #[validate(length(min = 1, max = 13, message = "ISBN must be 1-13 characters"))]
    pub isbn: String,
    /// Select one or several genre(s) for this book
    #[serde(default)]
    pub genre_ids: Vec<i32>,
    /// Select the language of the original version of this book
    pub language_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> Book {
        Book {
            id: 1,
            title: "Le petit prince".to_string(),
            author_id: None,
            summary: "a beautiful book".to_string(),
            isbn: "123-567890123".to_string(),
            language_id: None,
            author_name: None,
            language_name: None,
            genres: Vec::new(),
        }
    }

    fn genre(id: i32, name: &str) -> Genre {
        Genre { id, name: name.to_string() }
    }

    #[test]
    fn test_display_and_url() {
        let book = book();
        assert_eq!(book.to_string(), "Le petit prince");
        assert_eq!(book.url(), "/catalog/book/1");
    }

    #[test]
    fn test_detail_serializes_url_beside_fields() {
        let body = serde_json::to_value(BookDetail::new(book(), Vec::new())).unwrap();
        assert_eq!(body["url"], "/catalog/book/1");
        assert_eq!(body["title"], "Le petit prince");
        assert_eq!(body["instances"], serde_json::json!([]));
    }

    #[test]
    fn test_display_genre_limits_to_three() {
        let mut book = book();
        assert_eq!(book.display_genre(), "");

        book.genres = vec![genre(1, "Fantasy"), genre(2, "Poems")];
        assert_eq!(book.display_genre(), "Fantasy, Poems");

        book.genres.push(genre(3, "Drama"));
        book.genres.push(genre(4, "Horror"));
        assert_eq!(book.display_genre(), "Fantasy, Poems, Drama");
    }

    #[test]
    fn test_isbn_length() {
        let form = BookForm {
            title: "Book Title".to_string(),
            author_id: None,
            summary: "My book summary".to_string(),
            isbn: "12345678901234".to_string(),
            genre_ids: Vec::new(),
            language_id: None,
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("isbn"));

        let ok = BookForm { isbn: "ABCDEFG".to_string(), ..form };
        assert!(ok.validate().is_ok());
    }
}
