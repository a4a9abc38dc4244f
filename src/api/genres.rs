//! Genre endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{genre::GenreForm, Genre, Page, PageQuery},
    AppState,
};

use super::AuthenticatedUser;

/// List genres
#[utoipa::path(
    get,
    path = "/catalog/genres/",
    tag = "genres",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of genres", body = Page<Genre>),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn list_genres(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<Genre>>> {
    let page = state.services.catalog.list_genres(&query).await?;
    Ok(Json(page))
}

/// Get a genre
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre", body = Genre),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn get_genre(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<Genre>> {
    let genre = state.services.catalog.get_genre(id).await?;
    Ok(Json(genre))
}

/// Create a genre
#[utoipa::path(
    post,
    path = "/catalog/genre/create/",
    tag = "genres",
    security(("bearer_auth" = [])),
    request_body = GenreForm,
    responses(
        (status = 201, description = "Genre created", body = Genre),
        (status = 302, description = "Not logged in"),
        (status = 400, description = "Invalid form", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing can_edit_book")
    )
)]
pub async fn create_genre(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(form): Json<GenreForm>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    claims.require_edit_books()?;

    let genre = state.services.catalog.create_genre(&form).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}

/// Update a genre
#[utoipa::path(
    post,
    path = "/catalog/genre/{id}/update/",
    tag = "genres",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Genre ID")),
    request_body = GenreForm,
    responses(
        (status = 200, description = "Genre updated", body = Genre),
        (status = 403, description = "Missing can_edit_book"),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn update_genre(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(form): Json<GenreForm>,
) -> AppResult<Json<Genre>> {
    claims.require_edit_books()?;

    let genre = state.services.catalog.update_genre(id, &form).await?;
    Ok(Json(genre))
}

/// Delete a genre
#[utoipa::path(
    post,
    path = "/catalog/genre/{id}/delete/",
    tag = "genres",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 204, description = "Genre deleted"),
        (status = 403, description = "Missing can_edit_book"),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn delete_genre(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_edit_books()?;

    state.services.catalog.delete_genre(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
