//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        book::{BookDetail, BookForm},
        loan, Book, Page, PageQuery,
    },
    AppState,
};

use super::AuthenticatedUser;

/// List books by title
#[utoipa::path(
    get,
    path = "/catalog/books/",
    tag = "books",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of books", body = Page<Book>),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<Book>>> {
    let page = state.services.catalog.list_books(&query).await?;
    Ok(Json(page))
}

/// Get a book with its copies
#[utoipa::path(
    get,
    path = "/catalog/book/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDetail),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<BookDetail>> {
    let book = state.services.catalog.get_book(id, loan::today()).await?;
    Ok(Json(book))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/catalog/book/create/",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = BookForm,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 302, description = "Not logged in"),
        (status = 400, description = "Invalid form", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing can_edit_book")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(form): Json<BookForm>,
) -> AppResult<(StatusCode, Json<Book>)> {
    claims.require_edit_books()?;

    let book = state.services.catalog.create_book(&form).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update a book
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/update/",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = BookForm,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid form", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing can_edit_book"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(form): Json<BookForm>,
) -> AppResult<Json<Book>> {
    claims.require_edit_books()?;

    let book = state.services.catalog.update_book(id, &form).await?;
    Ok(Json(book))
}

/// Delete a book. Its copies are kept without a book.
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/delete/",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 403, description = "Missing can_edit_book"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_edit_books()?;

    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
