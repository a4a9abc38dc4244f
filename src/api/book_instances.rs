//! Book instance (copy) endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book_instance::{BookInstanceDetail, BookInstanceForm},
        loan, BookInstance, Page, PageQuery,
    },
    AppState,
};

use super::AuthenticatedUser;

/// List every copy, soonest due first
#[utoipa::path(
    get,
    path = "/catalog/bookinstances/",
    tag = "book_instances",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of copies", body = Page<BookInstance>),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn list_book_instances(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<BookInstance>>> {
    let page = state
        .services
        .catalog
        .list_book_instances(&query, loan::today())
        .await?;
    Ok(Json(page))
}

/// Get a copy
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}",
    tag = "book_instances",
    params(("id" = Uuid, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Copy details", body = BookInstanceDetail),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn get_book_instance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookInstanceDetail>> {
    let instance = state
        .services
        .catalog
        .get_book_instance(id, loan::today())
        .await?;
    Ok(Json(instance))
}

/// Create a copy
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/create/",
    tag = "book_instances",
    security(("bearer_auth" = [])),
    request_body = BookInstanceForm,
    responses(
        (status = 201, description = "Copy created", body = BookInstance),
        (status = 302, description = "Not logged in"),
        (status = 400, description = "Invalid form", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing can_edit_book")
    )
)]
pub async fn create_book_instance(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(form): Json<BookInstanceForm>,
) -> AppResult<(StatusCode, Json<BookInstance>)> {
    claims.require_edit_books()?;

    let instance = state.services.catalog.create_book_instance(&form).await?;
    Ok((StatusCode::CREATED, Json(instance)))
}

/// Update a copy. Any status may be set.
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/update/",
    tag = "book_instances",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book instance ID")),
    request_body = BookInstanceForm,
    responses(
        (status = 200, description = "Copy updated", body = BookInstance),
        (status = 400, description = "Invalid form", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing can_edit_book"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn update_book_instance(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(form): Json<BookInstanceForm>,
) -> AppResult<Json<BookInstance>> {
    claims.require_edit_books()?;

    let instance = state.services.catalog.update_book_instance(id, &form).await?;
    Ok(Json(instance))
}

/// Delete a copy
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/delete/",
    tag = "book_instances",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book instance ID")),
    responses(
        (status = 204, description = "Copy deleted"),
        (status = 403, description = "Missing can_edit_book"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn delete_book_instance(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_edit_books()?;

    state.services.catalog.delete_book_instance(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
