//! Login endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{LoginRequest, LoginResponse},
    AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LoginPageQuery {
    /// Location to return to after logging in
    pub next: Option<String>,
}

/// How to log in
#[derive(Serialize, ToSchema)]
pub struct LoginPage {
    pub method: String,
    pub fields: Vec<String>,
    /// Where the client came from, echoed back
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// Describe the login form
#[utoipa::path(
    get,
    path = "/accounts/login/",
    tag = "auth",
    params(LoginPageQuery),
    responses(
        (status = 200, description = "Login form description", body = LoginPage)
    )
)]
pub async fn login_page(Query(query): Query<LoginPageQuery>) -> Json<LoginPage> {
    Json(LoginPage {
        method: "POST".to_string(),
        fields: vec!["username".to_string(), "password".to_string()],
        next: query.next.filter(|n| !n.is_empty()),
    })
}

/// Log in and receive a bearer token
#[utoipa::path(
    post,
    path = "/accounts/login/",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Missing username or password", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    request.validate()?;

    let users = &state.services.users;
    let (token, user) = users.authenticate(&request.username, &request.password).await?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: users.token_lifetime(),
        user,
    }))
}
