//! Authentication and permission gates.
//!
//! Every request here is answered before the handler touches the database,
//! so the router runs on a pool that never connects.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_offline_app, get, get_auth, location, post_auth, post_form_auth, post_json,
    post_json_auth, token_for,
};
use locallibrary_server::models::user::Permission;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_my_books_redirects_anonymous_to_login() {
    let response = get(build_offline_app(), "/catalog/mybooks/").await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/accounts/login/?next=/catalog/mybooks/");
}

#[tokio::test]
async fn test_renew_redirects_anonymous_to_login() {
    let id = Uuid::new_v4();
    let response = get(build_offline_app(), &format!("/catalog/bookinstance/{}/renew/", id)).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        format!("/accounts/login/?next=/catalog/bookinstance/{}/renew/", id)
    );
}

#[tokio::test]
async fn test_create_redirects_anonymous_to_login() {
    let body = json!({ "name": "Fantasy" });
    let response = post_json(build_offline_app(), "/catalog/genre/create/", body).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/accounts/login/?next=/catalog/genre/create/");
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let response = get_auth(build_offline_app(), "/catalog/mybooks/", "not-a-token").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["error"], "NotAuthenticated");
}

#[tokio::test]
async fn test_all_borrowed_requires_mark_returned() {
    let token = token_for(1, vec![Permission::CanEditBook], false);
    let response = get_auth(build_offline_app(), "/catalog/allborrowed/", &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_renewal_form_requires_mark_returned() {
    let token = token_for(1, Vec::new(), false);
    let uri = format!("/catalog/bookinstance/{}/renew/", Uuid::new_v4());

    let response = get_auth(build_offline_app(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_form_auth(build_offline_app(), &uri, &token, "due_back=2024-01-01").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_renewal_checks_permission_before_body() {
    let uri = format!("/catalog/bookinstance/{}/renew/", Uuid::new_v4());
    let body = json!({ "due_back": "2024-01-01" });

    let patron = token_for(1, Vec::new(), false);
    let response = post_json_auth(build_offline_app(), &uri, &patron, body.clone()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let librarian = token_for(2, vec![Permission::CanMarkReturned], false);
    let response = post_json_auth(build_offline_app(), &uri, &librarian, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_author_edits_require_edit_author() {
    let token = token_for(1, vec![Permission::CanEditBook], false);
    let body = json!({ "first_name": "John", "last_name": "Smith" });

    let response = post_json_auth(build_offline_app(), "/catalog/author/create/", &token, body.clone()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(build_offline_app(), "/catalog/author/1/update/", &token, body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_auth(build_offline_app(), "/catalog/author/1/delete/", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_book_edits_require_edit_book() {
    let token = token_for(1, vec![Permission::CanEditAuthor, Permission::CanMarkReturned], false);

    let book = json!({ "title": "Book Title", "summary": "Summary", "isbn": "ABCDEFG" });
    let response = post_json_auth(build_offline_app(), "/catalog/book/create/", &token, book).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let genre = json!({ "name": "Fantasy" });
    let response = post_json_auth(build_offline_app(), "/catalog/genre/create/", &token, genre).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let language = json!({ "name": "English" });
    let response = post_json_auth(build_offline_app(), "/catalog/language/1/update/", &token, language).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let uri = format!("/catalog/bookinstance/{}/delete/", Uuid::new_v4());
    let response = post_auth(build_offline_app(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_requires_staff() {
    let token = token_for(1, Permission::ALL.to_vec(), false);
    let response = get_auth(build_offline_app(), "/catalog/admin/book/", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let staff = token_for(2, Vec::new(), true);
    let response = get_auth(build_offline_app(), "/catalog/admin/", &staff).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json[0]["model"], "author");
    assert_eq!(json[2]["list_filter"], json!(["status", "due_back"]));
}

#[tokio::test]
async fn test_page_zero_is_not_found() {
    let response = get(build_offline_app(), "/catalog/books/?page=0").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_page_echoes_next() {
    let response = get(build_offline_app(), "/accounts/login/?next=/catalog/mybooks/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["next"], "/catalog/mybooks/");
    assert_eq!(json["method"], "POST");
}

#[tokio::test]
async fn test_login_requires_credentials() {
    let body = json!({ "username": "", "password": "" });
    let response = post_json(build_offline_app(), "/accounts/login/", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["fields"]["username"].is_array());
}

#[tokio::test]
async fn test_health_and_docs() {
    let response = get(build_offline_app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");

    let response = get(build_offline_app(), "/api-docs/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);
}
