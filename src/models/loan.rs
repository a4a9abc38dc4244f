//! Loan lifecycle rules for book instances.
//!
//! A librarian may move a copy's due-back date anywhere between today and
//! four weeks ahead. The renewal form is pre-filled three weeks ahead.

use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Default renewal period offered on the form
pub const DEFAULT_RENEWAL_WEEKS: i64 = 3;

/// Longest renewal a librarian may grant
pub const MAX_RENEWAL_WEEKS: i64 = 4;

/// Why a candidate due-back date was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvalidDate {
    #[error("Invalid date - renewal in past")]
    Past,
    #[error("Invalid date - renewal more than 4 weeks ahead")]
    TooFar,
}

/// The library's current date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Date pre-populated on the renewal form.
pub fn propose_renewal_date(today: NaiveDate) -> NaiveDate {
    today + Duration::weeks(DEFAULT_RENEWAL_WEEKS)
}

/// Latest due-back date accepted for a renewal made on `today`.
pub fn latest_renewal_date(today: NaiveDate) -> NaiveDate {
    today + Duration::weeks(MAX_RENEWAL_WEEKS)
}

/// Check a candidate due-back date. Both bounds are inclusive.
pub fn validate_renewal(candidate: NaiveDate, today: NaiveDate) -> Result<NaiveDate, InvalidDate> {
    if candidate < today {
        return Err(InvalidDate::Past);
    }
    if candidate > latest_renewal_date(today) {
        return Err(InvalidDate::TooFar);
    }
    Ok(candidate)
}

/// A copy is overdue once its due-back date has passed, whatever its status.
pub fn is_overdue(due_back: Option<NaiveDate>, today: NaiveDate) -> bool {
    due_back.is_some_and(|due| due < today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_propose_three_weeks_ahead() {
        let today = day(2024, 2, 20);
        assert_eq!(propose_renewal_date(today), day(2024, 3, 12));
        assert_eq!(propose_renewal_date(today) - today, Duration::days(21));
    }

    #[test]
    fn test_renewal_today_is_valid() {
        let today = day(2024, 5, 1);
        assert_eq!(validate_renewal(today, today), Ok(today));
    }

    #[test]
    fn test_renewal_max_is_valid() {
        let today = day(2024, 5, 1);
        let max = today + Duration::weeks(4);
        assert_eq!(validate_renewal(max, today), Ok(max));
    }

    #[test]
    fn test_renewal_in_past() {
        let today = day(2024, 5, 1);
        assert_eq!(
            validate_renewal(today - Duration::days(1), today),
            Err(InvalidDate::Past)
        );
    }

    #[test]
    fn test_renewal_too_far() {
        let today = day(2024, 5, 1);
        assert_eq!(
            validate_renewal(today + Duration::days(29), today),
            Err(InvalidDate::TooFar)
        );
    }

    #[test]
    fn test_renewal_window_sweep() {
        let today = day(2023, 12, 20);
        for offset in -10..=40 {
            let candidate = today + Duration::days(offset);
            let accepted = validate_renewal(candidate, today).is_ok();
            assert_eq!(accepted, (0..=28).contains(&offset), "offset {}", offset);
        }
    }

    #[test]
    fn test_is_overdue() {
        let today = day(2024, 1, 10);
        assert!(is_overdue(Some(day(2024, 1, 9)), today));
        assert!(!is_overdue(Some(today), today));
        assert!(!is_overdue(Some(day(2024, 1, 11)), today));
        assert!(!is_overdue(None, today));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(InvalidDate::Past.to_string(), "Invalid date - renewal in past");
        assert_eq!(
            InvalidDate::TooFar.to_string(),
            "Invalid date - renewal more than 4 weeks ahead"
        );
    }
}
