//! Catalog home page

use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;

use crate::{error::AppResult, models::summary::CatalogSummary, AppState};

use super::Session;

/// Counts of catalog records and the session's visit count
#[utoipa::path(
    get,
    path = "/catalog/",
    tag = "catalog",
    responses(
        (status = 200, description = "Catalog summary", body = CatalogSummary)
    )
)]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<(CookieJar, Json<CatalogSummary>)> {
    let mut summary = state.services.catalog.summary().await?;
    summary.num_visits = state.services.sessions.record_visit(&session.id).await?;
    Ok((session.jar, Json(summary)))
}
