//! Author endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        author::{AuthorDetail, AuthorForm},
        Author, Page, PageQuery,
    },
    AppState,
};

use super::AuthenticatedUser;

/// List authors by last name, then first name
#[utoipa::path(
    get,
    path = "/catalog/authors/",
    tag = "authors",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of authors", body = Page<Author>),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<Author>>> {
    let page = state.services.catalog.list_authors(&query).await?;
    Ok(Json(page))
}

/// Get an author with their books
#[utoipa::path(
    get,
    path = "/catalog/author/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorDetail),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorDetail>> {
    let author = state.services.catalog.get_author(id).await?;
    Ok(Json(author))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/catalog/author/create/",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = AuthorForm,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 302, description = "Not logged in"),
        (status = 400, description = "Invalid form", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing can_edit_author")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(form): Json<AuthorForm>,
) -> AppResult<(StatusCode, Json<Author>)> {
    claims.require_edit_authors()?;

    let author = state.services.catalog.create_author(&form).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Update an author
#[utoipa::path(
    post,
    path = "/catalog/author/{id}/update/",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    request_body = AuthorForm,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 400, description = "Invalid form", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing can_edit_author"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(form): Json<AuthorForm>,
) -> AppResult<Json<Author>> {
    claims.require_edit_authors()?;

    let author = state.services.catalog.update_author(id, &form).await?;
    Ok(Json(author))
}

/// Delete an author. Their books are kept without an author.
#[utoipa::path(
    post,
    path = "/catalog/author/{id}/delete/",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 403, description = "Missing can_edit_author"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_edit_authors()?;

    state.services.catalog.delete_author(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
