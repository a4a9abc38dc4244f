//! Book instance (loanable copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::{clean_date, loan};

/// Availability of a copy. Any status may be set to any other by an edit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum LoanStatus {
    #[default]
    #[serde(rename = "m")]
    Maintenance,
    #[serde(rename = "o")]
    OnLoan,
    #[serde(rename = "a")]
    Available,
    #[serde(rename = "r")]
    Reserved,
}

impl LoanStatus {
    pub const ALL: [LoanStatus; 4] = [
        LoanStatus::Maintenance,
        LoanStatus::OnLoan,
        LoanStatus::Available,
        LoanStatus::Reserved,
    ];

    /// One-character code stored in the database
    pub fn code(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "m",
            LoanStatus::OnLoan => "o",
            LoanStatus::Available => "a",
            LoanStatus::Reserved => "r",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "Maintenance",
            LoanStatus::OnLoan => "On loan",
            LoanStatus::Available => "Available",
            LoanStatus::Reserved => "Reserved",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" => Ok(LoanStatus::Maintenance),
            "o" => Ok(LoanStatus::OnLoan),
            "a" => Ok(LoanStatus::Available),
            "r" => Ok(LoanStatus::Reserved),
            _ => Err(format!("Invalid loan status: {}", s)),
        }
    }
}

// SQLx conversion for LoanStatus (stored as its one-character code)
impl sqlx::Type<Postgres> for LoanStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for LoanStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.trim().parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for LoanStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.code(), buf)
    }
}

/// A specific copy of a book that can be borrowed
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    /// Unique ID for this particular book across whole library
    pub id: Uuid,
    pub book_id: Option<i32>,
    /// Language of this copy of the book
    pub language_id: Option<i32>,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
    pub borrower_id: Option<i32>,
    // Computed fields (populated when queried with JOINs, None otherwise)
    #[sqlx(default)]
    #[serde(default)]
    pub book_title: Option<String>,
    #[sqlx(default)]
    #[serde(default)]
    pub language_name: Option<String>,
    #[sqlx(default)]
    #[serde(default)]
    pub borrower_username: Option<String>,
    /// Derived from `due_back` at read time
    #[sqlx(skip)]
    #[serde(default)]
    pub is_overdue: bool,
}

impl BookInstance {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        loan::is_overdue(self.due_back, today)
    }

    /// Fill the derived overdue flag for `today`
    pub fn with_overdue(mut self, today: NaiveDate) -> Self {
        self.is_overdue = self.is_overdue(today);
        self
    }

    /// Title of the book this copy belongs to, or "no book"
    pub fn display_title(&self) -> &str {
        self.book_title.as_deref().unwrap_or("no book")
    }

    /// Canonical location of this copy's detail view
    pub fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }
}

impl std::fmt::Display for BookInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.id, self.display_title())
    }
}

/// A copy with the location of its detail view
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookInstanceDetail {
    #[serde(flatten)]
    pub instance: BookInstance,
    pub url: String,
}

impl From<BookInstance> for BookInstanceDetail {
    fn from(instance: BookInstance) -> Self {
        let url = instance.url();
        Self { instance, url }
    }
}

/// Create or update book instance request
#[serde_as]
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BookInstanceForm {
    pub book_id: Option<i32>,
    pub language_id: Option<i32>,
    #[validate(length(min = 1, max = 200, message = "Imprint must be 1-200 characters"))]
    pub imprint: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub due_back: Option<String>,
    #[serde(default)]
    pub status: LoanStatus,
    pub borrower_id: Option<i32>,
}

/// Book instance fields after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInstanceInput {
    pub book_id: Option<i32>,
    pub language_id: Option<i32>,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
    pub borrower_id: Option<i32>,
}

impl BookInstanceForm {
    pub fn clean(&self) -> Result<BookInstanceInput, ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_default();
        let due_back = clean_date("due_back", self.due_back.as_deref(), &mut errors);

        if !errors.errors().is_empty() {
            return Err(errors);
        }

        Ok(BookInstanceInput {
            book_id: self.book_id,
            language_id: self.language_id,
            imprint: self.imprint.trim().to_string(),
            due_back,
            status: self.status,
            borrower_id: self.borrower_id,
        })
    }
}
