//! Data models for the catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;
pub mod language;
pub mod loan;
pub mod renewal;
pub mod summary;
pub mod user;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{ValidationError, ValidationErrors};

use crate::error::{AppError, AppResult};

// Re-export commonly used types
pub use author::Author;
pub use book::Book;
pub use book_instance::{BookInstance, LoanStatus};
pub use genre::Genre;
pub use language::Language;
pub use user::{Permission, User, UserClaims};

/// Input formats accepted for date fields, tried in order
const DATE_INPUT_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// `MM/DD/YY`. chrono's `%Y` also takes a two-digit year, so this one is
/// only tried when the year segment has exactly two digits.
const SHORT_YEAR_FORMAT: &str = "%m/%d/%y";

/// Parse a date as typed into a form field.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if has_short_year(value) {
        return NaiveDate::parse_from_str(value, SHORT_YEAR_FORMAT).ok();
    }
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

fn has_short_year(value: &str) -> bool {
    match value.rsplit_once('/') {
        Some((_, year)) => year.len() == 2 && year.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// Parse an optional date field, recording "Enter a valid date." under
/// `field` when the text does not parse.
pub fn clean_date(
    field: &'static str,
    value: Option<&str>,
    errors: &mut ValidationErrors,
) -> Option<NaiveDate> {
    let value = value?;
    match parse_date(value) {
        Some(date) => Some(date),
        None => {
            let mut error = ValidationError::new("invalid_date");
            error.message = Some("Enter a valid date.".into());
            errors.add(field, error);
            None
        }
    }
}

/// Page selection from the query string (1-based)
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    pub page: Option<i64>,
}

/// A validated page request with a fixed page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    pub fn new(query: &PageQuery, per_page: i64) -> AppResult<Self> {
        let page = query.page.unwrap_or(1);
        if page < 1 {
            return Err(AppError::NotFound(format!("Invalid page ({})", page)));
        }
        Ok(Self { page, per_page })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    /// Number of pages for `total` rows; an empty listing still has one page.
    pub fn num_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            1
        } else {
            (total + self.per_page - 1) / self.per_page
        }
    }

    /// Reject pages past the end of the listing.
    pub fn check_in_range(&self, total: i64) -> AppResult<()> {
        if self.page > self.num_pages(total) {
            return Err(AppError::NotFound(format!(
                "Invalid page ({}): that page contains no results",
                self.page
            )));
        }
        Ok(())
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
pub struct Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub items: Vec<T>,
    /// Total number of rows across all pages
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub num_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        let num_pages = request.num_pages(total);
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
            num_pages,
            has_next: request.page < num_pages,
            has_previous: request.page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(1932, 5, 17);
        assert_eq!(parse_date("1932-05-17"), expected);
        assert_eq!(parse_date("05/17/1932"), expected);
        assert_eq!(parse_date(" 1932-05-17 "), expected);
        assert_eq!(parse_date("a long time ago"), None);
        assert_eq!(parse_date("2023-02-30"), None);
    }

    #[test]
    fn test_parse_date_two_digit_year() {
        assert_eq!(parse_date("11/02/26"), NaiveDate::from_ymd_opt(2026, 11, 2));
        assert_eq!(parse_date("05/17/32"), NaiveDate::from_ymd_opt(2032, 5, 17));
        assert_eq!(parse_date("11/02/2026"), NaiveDate::from_ymd_opt(2026, 11, 2));
        assert_eq!(parse_date("11/02/026"), NaiveDate::from_ymd_opt(26, 11, 2));
        assert_eq!(parse_date("13/02/26"), None);
    }

    #[test]
    fn test_clean_date_records_error() {
        let mut errors = ValidationErrors::new();
        assert_eq!(clean_date("date_of_death", Some("not yet"), &mut errors), None);
        assert_eq!(clean_date("date_of_birth", None, &mut errors), None);
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 1);
        assert!(fields.contains_key("date_of_death"));
    }

    #[test]
    fn test_page_request_bounds() {
        assert!(PageRequest::new(&PageQuery { page: Some(0) }, 10).is_err());

        let request = PageRequest::new(&PageQuery { page: Some(2) }, 10).unwrap();
        assert_eq!(request.offset(), 10);
        assert!(request.check_in_range(13).is_ok());
        assert!(request.check_in_range(10).is_err());

        let first = PageRequest::new(&PageQuery::default(), 5).unwrap();
        assert_eq!(first.page, 1);
        assert!(first.check_in_range(0).is_ok());
        assert_eq!(first.num_pages(11), 3);
    }

    #[test]
    fn test_page_flags() {
        let request = PageRequest { page: 2, per_page: 5 };
        let page: Page<Genre> = Page::new(Vec::new(), 11, request);
        assert_eq!(page.num_pages, 3);
        assert!(page.has_next);
        assert!(page.has_previous);
    }
}
