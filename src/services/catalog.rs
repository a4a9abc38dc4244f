//! Catalog service: listings, details and edits of the catalog entities

use chrono::NaiveDate;
use indexmap::IndexMap;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    admin::{self, ModelAdmin},
    error::{AppError, AppResult},
    models::{
        author::{AuthorDetail, AuthorForm},
        book::{BookDetail, BookForm},
        book_instance::{BookInstanceDetail, BookInstanceForm, BookInstanceInput},
        genre::GenreForm,
        language::LanguageForm,
        summary::CatalogSummary,
        Author, Book, BookInstance, Genre, Language, LoanStatus, Page, PageQuery, PageRequest,
    },
    repository::Repository,
};

pub const BOOKS_PER_PAGE: i64 = 10;
pub const AUTHORS_PER_PAGE: i64 = 10;
pub const GENRES_PER_PAGE: i64 = 10;
pub const LANGUAGES_PER_PAGE: i64 = 10;
pub const BOOK_INSTANCES_PER_PAGE: i64 = 5;
pub const ADMIN_ROWS_PER_PAGE: i64 = 100;

const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

/// Record a reference to a row that does not exist
fn invalid_choice(errors: &mut ValidationErrors, field: &'static str) {
    let mut error = ValidationError::new("invalid_choice");
    error.message = Some(INVALID_CHOICE.into());
    errors.add(field, error);
}

fn into_result(errors: ValidationErrors) -> AppResult<()> {
    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(AppError::FieldValidation(errors))
    }
}

/// One page of admin rows for a model
#[derive(Debug, serde::Serialize)]
pub struct AdminListing {
    #[serde(flatten)]
    pub admin: ModelAdmin,
    pub rows: Vec<IndexMap<String, Option<String>>>,
    pub total: i64,
    pub page: i64,
    pub num_pages: i64,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Round-trip to the database
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }

    /// Counts for the catalog home page; the visit count is filled by the caller
    pub async fn summary(&self) -> AppResult<CatalogSummary> {
        let by_status = self.repository.book_instances.count_by_status().await?;
        let status_count = |status: LoanStatus| by_status.get(&status).copied().unwrap_or(0);

        Ok(CatalogSummary {
            num_books: self.repository.books.count().await?,
            num_instances: self.repository.book_instances.count().await?,
            num_instances_available: status_count(LoanStatus::Available),
            num_instances_reserved: status_count(LoanStatus::Reserved),
            num_instances_loan: status_count(LoanStatus::OnLoan),
            num_instances_maintenance: status_count(LoanStatus::Maintenance),
            num_authors: self.repository.authors.count().await?,
            num_genres: self.repository.genres.count().await?,
            num_languages: self.repository.languages.count().await?,
            num_visits: 0,
        })
    }

    // Genres

    pub async fn list_genres(&self, query: &PageQuery) -> AppResult<Page<Genre>> {
        let request = PageRequest::new(query, GENRES_PER_PAGE)?;
        let total = self.repository.genres.count().await?;
        request.check_in_range(total)?;
        let genres = self.repository.genres.list(request).await?;
        Ok(Page::new(genres, total, request))
    }

    pub async fn get_genre(&self, id: i32) -> AppResult<Genre> {
        self.repository.genres.get_by_id(id).await
    }

    pub async fn create_genre(&self, form: &GenreForm) -> AppResult<Genre> {
        form.validate()?;
        let genre = self.repository.genres.create(form).await?;
        tracing::info!(genre_id = genre.id, "Genre created");
        Ok(genre)
    }

    pub async fn update_genre(&self, id: i32, form: &GenreForm) -> AppResult<Genre> {
        form.validate()?;
        let genre = self.repository.genres.update(id, form).await?;
        tracing::info!(genre_id = id, "Genre updated");
        Ok(genre)
    }

    pub async fn delete_genre(&self, id: i32) -> AppResult<()> {
        self.repository.genres.delete(id).await?;
        tracing::info!(genre_id = id, "Genre deleted");
        Ok(())
    }

    // Languages

    pub async fn list_languages(&self, query: &PageQuery) -> AppResult<Page<Language>> {
        let request = PageRequest::new(query, LANGUAGES_PER_PAGE)?;
        let total = self.repository.languages.count().await?;
        request.check_in_range(total)?;
        let languages = self.repository.languages.list(request).await?;
        Ok(Page::new(languages, total, request))
    }

    pub async fn get_language(&self, id: i32) -> AppResult<Language> {
        self.repository.languages.get_by_id(id).await
    }

    pub async fn create_language(&self, form: &LanguageForm) -> AppResult<Language> {
        form.validate()?;
        let language = self.repository.languages.create(form).await?;
        tracing::info!(language_id = language.id, "Language created");
        Ok(language)
    }

    pub async fn update_language(&self, id: i32, form: &LanguageForm) -> AppResult<Language> {
        form.validate()?;
        let language = self.repository.languages.update(id, form).await?;
        tracing::info!(language_id = id, "Language updated");
        Ok(language)
    }

    pub async fn delete_language(&self, id: i32) -> AppResult<()> {
        self.repository.languages.delete(id).await?;
        tracing::info!(language_id = id, "Language deleted");
        Ok(())
    }

    // Authors

    pub async fn list_authors(&self, query: &PageQuery) -> AppResult<Page<Author>> {
        let request = PageRequest::new(query, AUTHORS_PER_PAGE)?;
        let total = self.repository.authors.count().await?;
        request.check_in_range(total)?;
        let authors = self.repository.authors.list(request).await?;
        Ok(Page::new(authors, total, request))
    }

    /// Author with the books attributed to them
    pub async fn get_author(&self, id: i32) -> AppResult<AuthorDetail> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self.repository.books.list_by_author(id).await?;
        Ok(AuthorDetail::new(author, books))
    }

    pub async fn create_author(&self, form: &AuthorForm) -> AppResult<Author> {
        let input = form.clean()?;
        let author = self.repository.authors.create(&input).await?;
        tracing::info!(author_id = author.id, "Author created");
        Ok(author)
    }

    pub async fn update_author(&self, id: i32, form: &AuthorForm) -> AppResult<Author> {
        let input = form.clean()?;
        let author = self.repository.authors.update(id, &input).await?;
        tracing::info!(author_id = id, "Author updated");
        Ok(author)
    }

    /// Delete an author; their books remain with no author
    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await?;
        tracing::info!(author_id = id, "Author deleted");
        Ok(())
    }

    // Books

    pub async fn list_books(&self, query: &PageQuery) -> AppResult<Page<Book>> {
        let request = PageRequest::new(query, BOOKS_PER_PAGE)?;
        let total = self.repository.books.count().await?;
        request.check_in_range(total)?;
        let books = self.repository.books.list(request).await?;
        Ok(Page::new(books, total, request))
    }

    /// Book with its copies
    pub async fn get_book(&self, id: i32, today: NaiveDate) -> AppResult<BookDetail> {
        let book = self.repository.books.get_by_id(id).await?;
        let instances = self
            .repository
            .book_instances
            .list_by_book(id)
            .await?
            .into_iter()
            .map(|instance| instance.with_overdue(today))
            .collect();
        Ok(BookDetail::new(book, instances))
    }

    async fn check_book_references(&self, form: &BookForm) -> AppResult<()> {
        let mut errors = form.validate().err().unwrap_or_default();

        if let Some(author_id) = form.author_id {
            if !self.repository.authors.exists(author_id).await? {
                invalid_choice(&mut errors, "author_id");
            }
        }
        if let Some(language_id) = form.language_id {
            if !self.repository.languages.exists(language_id).await? {
                invalid_choice(&mut errors, "language_id");
            }
        }
        if !form.genre_ids.is_empty() {
            let found = self.repository.genres.existing_ids(&form.genre_ids).await?;
            if form.genre_ids.iter().any(|id| !found.contains(id)) {
                invalid_choice(&mut errors, "genre_ids");
            }
        }

        into_result(errors)
    }

    pub async fn create_book(&self, form: &BookForm) -> AppResult<Book> {
        self.check_book_references(form).await?;
        let book = self.repository.books.create(form).await?;
        tracing::info!(book_id = book.id, "Book created");
        Ok(book)
    }

    pub async fn update_book(&self, id: i32, form: &BookForm) -> AppResult<Book> {
        self.check_book_references(form).await?;
        let book = self.repository.books.update(id, form).await?;
        tracing::info!(book_id = id, "Book updated");
        Ok(book)
    }

    /// Delete a book; its copies remain with no book
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }

    // Book instances

    pub async fn list_book_instances(
        &self,
        query: &PageQuery,
        today: NaiveDate,
    ) -> AppResult<Page<BookInstance>> {
        let request = PageRequest::new(query, BOOK_INSTANCES_PER_PAGE)?;
        let total = self.repository.book_instances.count().await?;
        request.check_in_range(total)?;
        let instances = self
            .repository
            .book_instances
            .list(request)
            .await?
            .into_iter()
            .map(|instance| instance.with_overdue(today))
            .collect();
        Ok(Page::new(instances, total, request))
    }

    pub async fn get_book_instance(
        &self,
        id: Uuid,
        today: NaiveDate,
    ) -> AppResult<BookInstanceDetail> {
        let instance = self.repository.book_instances.get_by_id(id).await?;
        Ok(instance.with_overdue(today).into())
    }

    async fn clean_book_instance(
        &self,
        form: &BookInstanceForm,
    ) -> AppResult<BookInstanceInput> {
        let (input, mut errors) = match form.clean() {
            Ok(input) => (Some(input), ValidationErrors::new()),
            Err(errors) => (None, errors),
        };

        if let Some(book_id) = form.book_id {
            if !self.repository.books.exists(book_id).await? {
                invalid_choice(&mut errors, "book_id");
            }
        }
        if let Some(language_id) = form.language_id {
            if !self.repository.languages.exists(language_id).await? {
                invalid_choice(&mut errors, "language_id");
            }
        }
        if let Some(borrower_id) = form.borrower_id {
            if !self.repository.users.exists(borrower_id).await? {
                invalid_choice(&mut errors, "borrower_id");
            }
        }

        into_result(errors)?;
        input.ok_or_else(|| AppError::Internal("Book instance form rejected without errors".to_string()))
    }

    pub async fn create_book_instance(&self, form: &BookInstanceForm) -> AppResult<BookInstance> {
        let input = self.clean_book_instance(form).await?;
        let instance = self.repository.book_instances.create(&input).await?;
        tracing::info!(book_instance_id = %instance.id, status = %instance.status, "Book instance created");
        Ok(instance)
    }

    pub async fn update_book_instance(
        &self,
        id: Uuid,
        form: &BookInstanceForm,
    ) -> AppResult<BookInstance> {
        let input = self.clean_book_instance(form).await?;
        let instance = self.repository.book_instances.update(id, &input).await?;
        tracing::info!(book_instance_id = %id, status = %instance.status, "Book instance updated");
        Ok(instance)
    }

    pub async fn delete_book_instance(&self, id: Uuid) -> AppResult<()> {
        self.repository.book_instances.delete(id).await?;
        tracing::info!(book_instance_id = %id, "Book instance deleted");
        Ok(())
    }

    // Admin

    /// Rows of a registered model rendered with its admin display configuration
    pub async fn admin_listing(&self, model: &str, query: &PageQuery) -> AppResult<AdminListing> {
        let config = admin::lookup(model)
            .ok_or_else(|| AppError::NotFound(format!("No admin registered for '{}'", model)))?;
        let request = PageRequest::new(query, ADMIN_ROWS_PER_PAGE)?;

        let (total, rows): (i64, Vec<IndexMap<String, Option<String>>>) = match config.model {
            "genre" => {
                let total = self.repository.genres.count().await?;
                request.check_in_range(total)?;
                let items = self.repository.genres.list(request).await?;
                (total, items.iter().map(|g| admin::list_row(config, g)).collect())
            }
            "language" => {
                let total = self.repository.languages.count().await?;
                request.check_in_range(total)?;
                let items = self.repository.languages.list(request).await?;
                (total, items.iter().map(|l| admin::list_row(config, l)).collect())
            }
            "author" => {
                let total = self.repository.authors.count().await?;
                request.check_in_range(total)?;
                let items = self.repository.authors.list(request).await?;
                (total, items.iter().map(|a| admin::list_row(config, a)).collect())
            }
            "book" => {
                let total = self.repository.books.count().await?;
                request.check_in_range(total)?;
                let items = self.repository.books.list(request).await?;
                (total, items.iter().map(|b| admin::list_row(config, b)).collect())
            }
            "bookinstance" => {
                let total = self.repository.book_instances.count().await?;
                request.check_in_range(total)?;
                let items = self.repository.book_instances.list(request).await?;
                (total, items.iter().map(|i| admin::list_row(config, i)).collect())
            }
            other => {
                return Err(AppError::Internal(format!("Admin model '{}' has no listing", other)))
            }
        };

        Ok(AdminListing {
            admin: *config,
            rows,
            total,
            page: request.page,
            num_pages: request.num_pages(total),
        })
    }
}
