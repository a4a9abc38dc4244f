//! Staff-only admin listings

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    admin::{ModelAdmin, REGISTRY},
    error::AppResult,
    models::PageQuery,
    services::catalog::AdminListing,
    AppState,
};

use super::AuthenticatedUser;

/// Display configuration of every registered model
#[utoipa::path(
    get,
    path = "/catalog/admin/",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Registered models with their list columns, filters and fieldsets"),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn admin_index(AuthenticatedUser(claims): AuthenticatedUser) -> AppResult<Json<Vec<ModelAdmin>>> {
    claims.require_staff()?;
    Ok(Json(REGISTRY.iter().map(|admin| **admin).collect()))
}

/// Rows of one model as configured by its `ModelAdmin`
#[utoipa::path(
    get,
    path = "/catalog/admin/{model}/",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("model" = String, Path, description = "Model name, e.g. bookinstance"),
        PageQuery
    ),
    responses(
        (status = 200, description = "One page of rows rendered per list_display"),
        (status = 403, description = "Staff privileges required"),
        (status = 404, description = "Model not registered or page out of range")
    )
)]
pub async fn admin_list(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(model): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<AdminListing>> {
    claims.require_staff()?;

    let listing = state.services.catalog.admin_listing(&model, &query).await?;
    Ok(Json(listing))
}
