//! Renewal form submitted by librarians

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidationErrors;

use super::{book_instance::BookInstance, clean_date, loan};

pub const RENEWAL_HELP_TEXT: &str = "Enter a date between now and 4 weeks (default 3).";

/// Urlencoded renewal submission
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RenewBookForm {
    #[serde(default)]
    pub due_back: String,
}

impl RenewBookForm {
    /// Parse the submitted date. A missing value is reported like any other
    /// unusable date.
    pub fn clean(&self) -> Result<NaiveDate, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let value = self.due_back.trim();
        let parsed = if value.is_empty() {
            let mut error = validator::ValidationError::new("required");
            error.message = Some("This field is required.".into());
            errors.add("due_back", error);
            None
        } else {
            clean_date("due_back", Some(value), &mut errors)
        };

        match parsed {
            Some(date) if errors.errors().is_empty() => Ok(date),
            _ => Err(errors),
        }
    }
}

/// Values the form starts from
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RenewalInitial {
    pub due_back: NaiveDate,
}

/// The renewal form as shown to the librarian, possibly with errors
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RenewalForm {
    pub book_instance: BookInstance,
    pub initial: RenewalInitial,
    pub help_text: String,
    /// Value submitted in a rejected attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_back: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    #[schema(value_type = Object)]
    pub errors: IndexMap<String, Vec<String>>,
}

impl RenewalForm {
    pub fn new(book_instance: BookInstance, today: NaiveDate) -> Self {
        Self {
            book_instance,
            initial: RenewalInitial {
                due_back: loan::propose_renewal_date(today),
            },
            help_text: RENEWAL_HELP_TEXT.to_string(),
            due_back: None,
            errors: IndexMap::new(),
        }
    }

    /// Re-render after a rejected submission
    pub fn with_errors(
        mut self,
        submitted: &str,
        errors: IndexMap<String, Vec<String>>,
    ) -> Self {
        self.due_back = Some(submitted.to_string());
        self.errors = errors;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LoanStatus;
    use uuid::Uuid;

    fn copy() -> BookInstance {
        BookInstance {
            id: Uuid::new_v4(),
            book_id: Some(1),
            language_id: None,
            imprint: "Unlikely Imprint, 2016".to_string(),
            due_back: None,
            status: LoanStatus::OnLoan,
            borrower_id: Some(1),
            book_title: Some("Book Title".to_string()),
            language_name: None,
            borrower_username: None,
            is_overdue: false,
        }
    }

    #[test]
    fn test_initial_is_three_weeks_ahead() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let form = RenewalForm::new(copy(), today);
        assert_eq!(form.initial.due_back, NaiveDate::from_ymd_opt(2024, 6, 22).unwrap());
        assert!(form.errors.is_empty());
    }

    #[test]
    fn test_clean() {
        let ok = RenewBookForm { due_back: "2024-06-15".to_string() };
        assert_eq!(ok.clean().unwrap(), NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());

        let bad = RenewBookForm { due_back: "next week".to_string() };
        let fields = crate::error::field_messages(&bad.clean().unwrap_err());
        assert_eq!(fields["due_back"], vec!["Enter a valid date."]);

        let missing = RenewBookForm::default();
        let fields = crate::error::field_messages(&missing.clean().unwrap_err());
        assert_eq!(fields["due_back"], vec!["This field is required."]);
    }

    #[test]
    fn test_rejected_form_keeps_submission() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut errors = IndexMap::new();
        errors.insert("due_back".to_string(), vec![loan::InvalidDate::Past.to_string()]);
        let form = RenewalForm::new(copy(), today).with_errors("2024-05-31", errors);
        assert_eq!(form.due_back.as_deref(), Some("2024-05-31"));
        let body = serde_json::to_value(&form).unwrap();
        assert_eq!(body["errors"]["due_back"][0], "Invalid date - renewal in past");
        assert_eq!(body["initial"]["due_back"], "2024-06-22");
    }
}
