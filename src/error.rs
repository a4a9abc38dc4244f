//! Error types for the LocalLibrary server

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::models::loan::InvalidDate;

/// Machine-readable error codes returned in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NotAuthenticated = 4,
    NoSuchData = 5,
    BadValue = 6,
    InvalidDate = 7,
    Duplicate = 8,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Bad credentials or an unusable bearer token
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// No credentials on a gated route; carries the login redirect target
    #[error("Login required")]
    LoginRequired { location: String },

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid fields: {0}")]
    FieldValidation(#[from] ValidationErrors),

    #[error("{0}")]
    InvalidDate(#[from] InvalidDate),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    /// Per-field messages for form validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub fields: Option<IndexMap<String, Vec<String>>>,
}

/// Flatten validator errors into `field -> [messages]`, sorted by field name.
pub fn field_messages(errors: &ValidationErrors) -> IndexMap<String, Vec<String>> {
    let mut fields: Vec<(String, Vec<String>)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields.into_iter().collect()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut fields = None;
        let (status, code, message) = match &self {
            AppError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthenticated, msg.clone())
            }
            AppError::LoginRequired { location } => {
                let body = Json(ErrorResponse {
                    code: ErrorCode::NotAuthenticated as u32,
                    error: format!("{:?}", ErrorCode::NotAuthenticated),
                    message: "Login required".to_string(),
                    fields: None,
                });
                return (StatusCode::FOUND, [(header::LOCATION, location.clone())], body)
                    .into_response();
            }
            AppError::Authorization(msg) => {
                (StatusCode::FORBIDDEN, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchData, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone()),
            AppError::FieldValidation(errors) => {
                fields = Some(field_messages(errors));
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::BadValue,
                    "Invalid form data".to_string(),
                )
            }
            AppError::InvalidDate(err) => {
                let mut map = IndexMap::new();
                map.insert("due_back".to_string(), vec![err.to_string()]);
                fields = Some(map);
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidDate, err.to_string())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Redis(e) => {
                tracing::error!("Redis error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Session store error".to_string(),
                )
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ErrorCode::Duplicate, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            fields,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
