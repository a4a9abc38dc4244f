//! Language endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{language::LanguageForm, Language, Page, PageQuery},
    AppState,
};

use super::AuthenticatedUser;

/// List languages
#[utoipa::path(
    get,
    path = "/catalog/languages/",
    tag = "languages",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of languages", body = Page<Language>),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn list_languages(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<Language>>> {
    let page = state.services.catalog.list_languages(&query).await?;
    Ok(Json(page))
}

/// Get a language
#[utoipa::path(
    get,
    path = "/catalog/language/{id}",
    tag = "languages",
    params(("id" = i32, Path, description = "Language ID")),
    responses(
        (status = 200, description = "Language", body = Language),
        (status = 404, description = "Language not found")
    )
)]
pub async fn get_language(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<Language>> {
    let language = state.services.catalog.get_language(id).await?;
    Ok(Json(language))
}

/// Create a language
#[utoipa::path(
    post,
    path = "/catalog/language/create/",
    tag = "languages",
    security(("bearer_auth" = [])),
    request_body = LanguageForm,
    responses(
        (status = 201, description = "Language created", body = Language),
        (status = 302, description = "Not logged in"),
        (status = 400, description = "Invalid form", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing can_edit_book")
    )
)]
pub async fn create_language(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(form): Json<LanguageForm>,
) -> AppResult<(StatusCode, Json<Language>)> {
    claims.require_edit_books()?;

    let language = state.services.catalog.create_language(&form).await?;
    Ok((StatusCode::CREATED, Json(language)))
}

/// Update a language
#[utoipa::path(
    post,
    path = "/catalog/language/{id}/update/",
    tag = "languages",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Language ID")),
    request_body = LanguageForm,
    responses(
        (status = 200, description = "Language updated", body = Language),
        (status = 403, description = "Missing can_edit_book"),
        (status = 404, description = "Language not found")
    )
)]
pub async fn update_language(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(form): Json<LanguageForm>,
) -> AppResult<Json<Language>> {
    claims.require_edit_books()?;

    let language = state.services.catalog.update_language(id, &form).await?;
    Ok(Json(language))
}

/// Delete a language
#[utoipa::path(
    post,
    path = "/catalog/language/{id}/delete/",
    tag = "languages",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Language ID")),
    responses(
        (status = 204, description = "Language deleted"),
        (status = 403, description = "Missing can_edit_book"),
        (status = 404, description = "Language not found")
    )
)]
pub async fn delete_language(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_edit_books()?;

    state.services.catalog.delete_language(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
