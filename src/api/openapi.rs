//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, auth, authors, book_instances, books, genres, health, home, languages, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LocalLibrary API",
        version = "0.1.0",
        description = "Library catalog REST API: books, authors, copies and loans",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login_page,
        auth::login,
        // Catalog
        home::index,
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        genres::list_genres,
        genres::get_genre,
        genres::create_genre,
        genres::update_genre,
        genres::delete_genre,
        languages::list_languages,
        languages::get_language,
        languages::create_language,
        languages::update_language,
        languages::delete_language,
        book_instances::list_book_instances,
        book_instances::get_book_instance,
        book_instances::create_book_instance,
        book_instances::update_book_instance,
        book_instances::delete_book_instance,
        // Loans
        loans::my_borrowed,
        loans::all_borrowed,
        loans::renewal_form,
        loans::renew_book_instance,
        // Admin
        admin::admin_index,
        admin::admin_list,
    ),
    components(
        schemas(
            // Auth
            auth::LoginPage,
            crate::models::user::LoginRequest,
            crate::models::user::LoginResponse,
            crate::models::user::User,
            crate::models::user::Permission,
            // Catalog
            crate::models::summary::CatalogSummary,
            crate::models::Book,
            crate::models::book::BookDetail,
            crate::models::book::BookForm,
            crate::models::Author,
            crate::models::author::AuthorDetail,
            crate::models::author::AuthorForm,
            crate::models::Genre,
            crate::models::genre::GenreForm,
            crate::models::Language,
            crate::models::language::LanguageForm,
            crate::models::BookInstance,
            crate::models::LoanStatus,
            crate::models::book_instance::BookInstanceDetail,
            crate::models::book_instance::BookInstanceForm,
            crate::models::PageQuery,
            // Loans
            crate::models::loan::InvalidDate,
            crate::models::renewal::RenewBookForm,
            crate::models::renewal::RenewalForm,
            crate::models::renewal::RenewalInitial,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "catalog", description = "Catalog home page"),
        (name = "books", description = "Books"),
        (name = "authors", description = "Authors"),
        (name = "genres", description = "Genres"),
        (name = "languages", description = "Languages"),
        (name = "book_instances", description = "Copies of books"),
        (name = "loans", description = "Borrowed copies and renewals"),
        (name = "admin", description = "Staff-only model listings")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_renewal() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/catalog/bookinstance/{id}/renew/"));
        assert!(doc.paths.paths.contains_key("/accounts/login/"));
    }

    #[test]
    fn test_document_lists_admin() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/catalog/admin/"));
        assert!(doc.paths.paths.contains_key("/catalog/admin/{model}/"));
    }
}
