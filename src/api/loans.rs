//! Loan endpoints: borrowed copies and renewals

use axum::{
    extract::{rejection::FormRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use indexmap::IndexMap;
use uuid::Uuid;

use crate::{
    error::{field_messages, AppError, AppResult},
    models::{
        loan,
        renewal::{RenewBookForm, RenewalForm},
        BookInstance, Page, PageQuery,
    },
    AppState,
};

use super::AuthenticatedUser;

/// Where a librarian lands after a successful renewal
pub const ALL_BORROWED_PATH: &str = "/catalog/allborrowed/";

/// Copies on loan to the current user
#[utoipa::path(
    get,
    path = "/catalog/mybooks/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Current user's loans, soonest due first", body = Page<BookInstance>),
        (status = 302, description = "Not logged in")
    )
)]
pub async fn my_borrowed(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<BookInstance>>> {
    let page = state
        .services
        .loans
        .borrowed_by(claims.user_id, &query, loan::today())
        .await?;
    Ok(Json(page))
}

/// Every copy on loan
#[utoipa::path(
    get,
    path = "/catalog/allborrowed/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "All loans, soonest due first", body = Page<BookInstance>),
        (status = 302, description = "Not logged in"),
        (status = 403, description = "Missing can_mark_returned")
    )
)]
pub async fn all_borrowed(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<BookInstance>>> {
    claims.require_mark_returned()?;

    let page = state.services.loans.all_borrowed(&query, loan::today()).await?;
    Ok(Json(page))
}

/// Renewal form, proposing a date three weeks ahead
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/renew/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Renewal form", body = RenewalForm),
        (status = 302, description = "Not logged in"),
        (status = 403, description = "Missing can_mark_returned"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn renewal_form(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RenewalForm>> {
    claims.require_mark_returned()?;

    let form = state.services.loans.renewal_form(id, loan::today()).await?;
    Ok(Json(form))
}

/// Submit a renewal. A refused date re-renders the form with the reason.
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/renew/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book instance ID")),
    request_body(content = RenewBookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Renewed; redirect to all borrowed books"),
        (status = 200, description = "Date refused; form with errors", body = RenewalForm),
        (status = 400, description = "Body is not an urlencoded form"),
        (status = 403, description = "Missing can_mark_returned"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn renew_book_instance(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    submitted: Result<Form<RenewBookForm>, FormRejection>,
) -> AppResult<Response> {
    claims.require_mark_returned()?;
    let Form(submitted) = submitted.map_err(|e| AppError::Validation(e.body_text()))?;

    let today = loan::today();
    let loans = &state.services.loans;
    let form = loans.renewal_form(id, today).await?;

    let candidate = match submitted.clean() {
        Ok(date) => date,
        Err(errors) => {
            let form = form.with_errors(&submitted.due_back, field_messages(&errors));
            return Ok(Json(form).into_response());
        }
    };

    match loans.renew(id, candidate, today).await {
        Ok(_) => Ok((StatusCode::FOUND, [(header::LOCATION, ALL_BORROWED_PATH)]).into_response()),
        Err(AppError::InvalidDate(reason)) => {
            tracing::debug!(book_instance_id = %id, %candidate, "Renewal refused: {}", reason);
            let mut errors = IndexMap::new();
            errors.insert("due_back".to_string(), vec![reason.to_string()]);
            Ok(Json(form.with_errors(&submitted.due_back, errors)).into_response())
        }
        Err(e) => Err(e),
    }
}
