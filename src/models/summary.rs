//! Home page summary counts

use serde::Serialize;
use utoipa::ToSchema;

/// Counts shown on the catalog home page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct CatalogSummary {
    pub num_books: i64,
    pub num_instances: i64,
    pub num_instances_available: i64,
    pub num_instances_reserved: i64,
    pub num_instances_loan: i64,
    pub num_instances_maintenance: i64,
    pub num_authors: i64,
    pub num_genres: i64,
    pub num_languages: i64,
    /// Visits to the home page in the current session
    pub num_visits: i64,
}
