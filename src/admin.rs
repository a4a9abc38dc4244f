//! Admin list display configuration.
//!
//! Each catalog model has an explicit `ModelAdmin` listing the columns shown
//! in admin listings, the filters offered and the edit-form layout.

use indexmap::IndexMap;
use serde::Serialize;

use crate::models::{Author, Book, BookInstance, Genre, Language};

/// A titled group of fields on the edit form. Fields sharing a row are
/// listed together in one inner slice.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Fieldset {
    pub title: Option<&'static str>,
    pub rows: &'static [&'static [&'static str]],
}

/// Display configuration for one model
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModelAdmin {
    pub model: &'static str,
    pub list_display: &'static [&'static str],
    pub list_filter: &'static [&'static str],
    pub fieldsets: &'static [Fieldset],
    /// Related models edited inline on this model's form
    pub inlines: &'static [&'static str],
}

pub const GENRE_ADMIN: ModelAdmin = ModelAdmin {
    model: "genre",
    list_display: &["name"],
    list_filter: &[],
    fieldsets: &[Fieldset { title: None, rows: &[&["name"]] }],
    inlines: &[],
};

pub const LANGUAGE_ADMIN: ModelAdmin = ModelAdmin {
    model: "language",
    list_display: &["name"],
    list_filter: &[],
    fieldsets: &[Fieldset { title: None, rows: &[&["name"]] }],
    inlines: &[],
};

pub const AUTHOR_ADMIN: ModelAdmin = ModelAdmin {
    model: "author",
    list_display: &["last_name", "first_name", "date_of_birth", "date_of_death"],
    list_filter: &[],
    fieldsets: &[Fieldset {
        title: None,
        rows: &[&["first_name"], &["last_name"], &["date_of_birth", "date_of_death"]],
    }],
    inlines: &["book"],
};

pub const BOOK_ADMIN: ModelAdmin = ModelAdmin {
    model: "book",
    list_display: &["title", "author", "display_genre", "language"],
    list_filter: &[],
    fieldsets: &[Fieldset {
        title: None,
        rows: &[&["title"], &["author"], &["summary"], &["isbn"], &["genre"], &["language"]],
    }],
    inlines: &["bookinstance"],
};

pub const BOOK_INSTANCE_ADMIN: ModelAdmin = ModelAdmin {
    model: "bookinstance",
    list_display: &["display_title", "language", "imprint", "status", "due_back", "borrower", "id"],
    list_filter: &["status", "due_back"],
    fieldsets: &[
        Fieldset {
            title: None,
            rows: &[&["book"], &["imprint"], &["id"], &["language"]],
        },
        Fieldset {
            title: Some("Availability"),
            rows: &[&["status"], &["due_back"], &["borrower"]],
        },
    ],
    inlines: &[],
};

/// Every registered model, in admin index order
pub const REGISTRY: [&ModelAdmin; 5] = [
    &AUTHOR_ADMIN,
    &BOOK_ADMIN,
    &BOOK_INSTANCE_ADMIN,
    &GENRE_ADMIN,
    &LANGUAGE_ADMIN,
];

pub fn lookup(model: &str) -> Option<&'static ModelAdmin> {
    REGISTRY.into_iter().find(|admin| admin.model == model)
}

/// Renders a single admin column for a model value
pub trait AdminDisplay {
    fn display_field(&self, field: &str) -> Option<String>;
}

/// Build one admin row: column name -> rendered value, in `list_display` order
pub fn list_row<T: AdminDisplay>(admin: &ModelAdmin, value: &T) -> IndexMap<String, Option<String>> {
    admin
        .list_display
        .iter()
        .map(|field| (field.to_string(), value.display_field(field)))
        .collect()
}

impl AdminDisplay for Genre {
    fn display_field(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "name" => Some(self.name.clone()),
            _ => None,
        }
    }
}

impl AdminDisplay for Language {
    fn display_field(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "name" => Some(self.name.clone()),
            _ => None,
        }
    }
}

impl AdminDisplay for Author {
    fn display_field(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "first_name" => Some(self.first_name.clone()),
            "last_name" => Some(self.last_name.clone()),
            "date_of_birth" => self.date_of_birth.map(|d| d.to_string()),
            "date_of_death" => self.date_of_death.map(|d| d.to_string()),
            _ => None,
        }
    }
}

impl AdminDisplay for Book {
    fn display_field(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "title" => Some(self.title.clone()),
            "author" => self.author_name.clone(),
            "summary" => Some(self.summary.clone()),
            "isbn" => Some(self.isbn.clone()),
            "display_genre" => Some(self.display_genre()),
            "language" => self.language_name.clone(),
            _ => None,
        }
    }
}

impl AdminDisplay for BookInstance {
    fn display_field(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "display_title" => Some(self.display_title().to_string()),
            "language" => self.language_name.clone(),
            "imprint" => Some(self.imprint.clone()),
            "status" => Some(self.status.label().to_string()),
            "due_back" => self.due_back.map(|d| d.to_string()),
            "borrower" => self.borrower_username.clone(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LoanStatus;
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("bookinstance").unwrap().list_filter, &["status", "due_back"]);
        assert!(lookup("user").is_none());
    }

    #[test]
    fn test_every_list_column_renders() {
        let author = Author {
            id: 7,
            first_name: "John".to_string(),
            last_name: "Smith".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1932, 5, 17),
            date_of_death: None,
        };
        let row = list_row(&AUTHOR_ADMIN, &author);
        let columns: Vec<_> = row.keys().map(String::as_str).collect();
        assert_eq!(columns, AUTHOR_ADMIN.list_display);
        assert_eq!(row["last_name"].as_deref(), Some("Smith"));
        assert_eq!(row["date_of_birth"].as_deref(), Some("1932-05-17"));
        assert_eq!(row["date_of_death"], None);
    }

    #[test]
    fn test_book_instance_row() {
        let instance = BookInstance {
            id: Uuid::nil(),
            book_id: None,
            language_id: None,
            imprint: "Unlikely Imprint, 2016".to_string(),
            due_back: None,
            status: LoanStatus::OnLoan,
            borrower_id: Some(2),
            book_title: None,
            language_name: Some("English".to_string()),
            borrower_username: Some("testuser1".to_string()),
            is_overdue: false,
        };
        let row = list_row(&BOOK_INSTANCE_ADMIN, &instance);
        assert_eq!(row["display_title"].as_deref(), Some("no book"));
        assert_eq!(row["status"].as_deref(), Some("On loan"));
        assert_eq!(row["borrower"].as_deref(), Some("testuser1"));
        assert_eq!(row["id"].as_deref(), Some("00000000-0000-0000-0000-000000000000"));
    }
}
