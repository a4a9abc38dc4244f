//! API handlers for the LocalLibrary catalog

pub mod admin;
pub mod auth;
pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod health;
pub mod home;
pub mod languages;
pub mod loans;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, Uri},
    routing::{get, post},
    RequestPartsExt, Router,
};
use axum_extra::{
    extract::cookie::{Cookie, CookieJar, SameSite},
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::{error::AppError, models::user::UserClaims, AppState};

pub const SESSION_COOKIE: &str = "sessionid";

/// Extractor for authenticated user from JWT token.
///
/// A request without credentials is sent to the login page with `next`
/// pointing back at the original location.
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(AUTHORIZATION) {
            return Err(AppError::LoginRequired {
                location: login_redirect(&state.config.auth.login_url, &parts.uri),
            });
        }

        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(bearer.token(), &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Session identifier from the `sessionid` cookie, created when absent.
/// Return `jar` from the handler so a new cookie reaches the client.
pub struct Session {
    pub id: String,
    pub jar: CookieJar,
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        if let Some(id) = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|id| is_valid_session_id(id))
        {
            return Ok(Session { id, jar });
        }

        let id = Uuid::new_v4().simple().to_string();
        let cookie = session_cookie(id.clone(), state.services.sessions.ttl_seconds());
        Ok(Session { id, jar: jar.add(cookie) })
    }
}

/// Session cookie living as long as its visit counter
fn session_cookie(id: String, ttl_seconds: u64) -> Cookie<'static> {
    let max_age = time::Duration::seconds(i64::try_from(ttl_seconds).unwrap_or(i64::MAX));
    Cookie::build((SESSION_COOKIE, id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build()
}

fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= 64 && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// `{login_url}?next={path}` with the path and query of `uri` percent-encoded
pub fn login_redirect(login_url: &str, uri: &Uri) -> String {
    let next = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    format!("{}?next={}", login_url, encode_query_value(next))
}

/// Percent-encode a query value, leaving path separators readable
fn encode_query_value(value: &str) -> String {
    urlencoding::encode(value).replace("%2F", "/")
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let catalog = Router::new()
        // Home
        .route("/catalog/", get(home::index))
        // Listings
        .route("/catalog/books/", get(books::list_books))
        .route("/catalog/authors/", get(authors::list_authors))
        .route("/catalog/bookinstances/", get(book_instances::list_book_instances))
        .route("/catalog/genres/", get(genres::list_genres))
        .route("/catalog/languages/", get(languages::list_languages))
        // Loans
        .route("/catalog/mybooks/", get(loans::my_borrowed))
        .route("/catalog/allborrowed/", get(loans::all_borrowed))
        .route(
            "/catalog/bookinstance/:id/renew/",
            get(loans::renewal_form).post(loans::renew_book_instance),
        )
        // Genres
        .route("/catalog/genre/create/", post(genres::create_genre))
        .route("/catalog/genre/:id", get(genres::get_genre))
        .route("/catalog/genre/:id/update/", post(genres::update_genre))
        .route("/catalog/genre/:id/delete/", post(genres::delete_genre))
        // Languages
        .route("/catalog/language/create/", post(languages::create_language))
        .route("/catalog/language/:id", get(languages::get_language))
        .route("/catalog/language/:id/update/", post(languages::update_language))
        .route("/catalog/language/:id/delete/", post(languages::delete_language))
        // Authors
        .route("/catalog/author/create/", post(authors::create_author))
        .route("/catalog/author/:id", get(authors::get_author))
        .route("/catalog/author/:id/update/", post(authors::update_author))
        .route("/catalog/author/:id/delete/", post(authors::delete_author))
        // Books
        .route("/catalog/book/create/", post(books::create_book))
        .route("/catalog/book/:id", get(books::get_book))
        .route("/catalog/book/:id/update/", post(books::update_book))
        .route("/catalog/book/:id/delete/", post(books::delete_book))
        // Book instances
        .route("/catalog/bookinstance/create/", post(book_instances::create_book_instance))
        .route("/catalog/bookinstance/:id", get(book_instances::get_book_instance))
        .route("/catalog/bookinstance/:id/update/", post(book_instances::update_book_instance))
        .route("/catalog/bookinstance/:id/delete/", post(book_instances::delete_book_instance))
        // Admin
        .route("/catalog/admin/", get(admin::admin_index))
        .route("/catalog/admin/:model/", get(admin::admin_list));

    let routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/accounts/login/", get(auth::login_page).post(auth::login))
        .merge(catalog)
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .merge(routes)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_redirect_keeps_path_and_query() {
        let uri: Uri = "/catalog/mybooks/?page=2".parse().unwrap();
        assert_eq!(
            login_redirect("/accounts/login/", &uri),
            "/accounts/login/?next=/catalog/mybooks/%3Fpage%3D2"
        );

        let uri: Uri = "/catalog/allborrowed/".parse().unwrap();
        assert_eq!(
            login_redirect("/accounts/login/", &uri),
            "/accounts/login/?next=/catalog/allborrowed/"
        );
    }

    #[test]
    fn test_login_redirect_encodes_reserved_characters() {
        let uri: Uri = "/catalog/books/?page=2&sort=title".parse().unwrap();
        assert_eq!(
            login_redirect("/accounts/login/", &uri),
            "/accounts/login/?next=/catalog/books/%3Fpage%3D2%26sort%3Dtitle"
        );
    }

    #[test]
    fn test_session_cookie_expires_with_counter() {
        let cookie = session_cookie("abc".to_string(), 1_209_600);
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(1_209_600)));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert!(cookie.to_string().contains("Max-Age=1209600"));
    }

    #[test]
    fn test_session_id_shape() {
        assert!(is_valid_session_id(&Uuid::new_v4().simple().to_string()));
        assert!(!is_valid_session_id(""));
        assert!(!is_valid_session_id("a;b"));
    }
}
