//! Books repository for database operations

use std::collections::HashMap;

use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{book::BookForm, Book, Genre, PageRequest},
};

/// Book columns with the author and language display names
const SELECT_BOOK: &str = r#"
    SELECT b.id, b.title, b.author_id, b.summary, b.isbn, b.language_id,
           a.last_name || ', ' || a.first_name AS author_name,
           l.name AS language_name
    FROM books b
    LEFT JOIN authors a ON b.author_id = a.id
    LEFT JOIN languages l ON b.language_id = l.id
"#;

/// Row of the book/genre association with the genre's name
#[derive(sqlx::FromRow)]
struct BookGenreRow {
    book_id: i32,
    id: i32,
    name: String,
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID, with its genres
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        let query = format!("{} WHERE b.id = $1", SELECT_BOOK);
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        let mut books = self.attach_genres(vec![book]).await?;
        books
            .pop()
            .ok_or_else(|| AppError::Internal("Book lost while loading genres".to_string()))
    }

    /// List one page of books ordered by title
    pub async fn list(&self, page: PageRequest) -> AppResult<Vec<Book>> {
        let query = format!("{} ORDER BY b.title, b.id LIMIT $1 OFFSET $2", SELECT_BOOK);
        let books = sqlx::query_as::<_, Book>(&query)
            .bind(page.per_page)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        self.attach_genres(books).await
    }

    /// All books attributed to an author
    pub async fn list_by_author(&self, author_id: i32) -> AppResult<Vec<Book>> {
        let query = format!("{} WHERE b.author_id = $1 ORDER BY b.title, b.id", SELECT_BOOK);
        let books = sqlx::query_as::<_, Book>(&query)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        self.attach_genres(books).await
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Genres of several books at once, keyed by book id, ordered by genre id
    pub async fn genres_for_books(&self, book_ids: &[i32]) -> AppResult<HashMap<i32, Vec<Genre>>> {
        let rows = sqlx::query_as::<_, BookGenreRow>(
            r#"
            SELECT bg.book_id, g.id, g.name
            FROM book_genres bg
            JOIN genres g ON bg.genre_id = g.id
            WHERE bg.book_id = ANY($1)
            ORDER BY g.id
            "#,
        )
        .bind(book_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut genres: HashMap<i32, Vec<Genre>> = HashMap::new();
        for row in rows {
            genres
                .entry(row.book_id)
                .or_default()
                .push(Genre { id: row.id, name: row.name });
        }
        Ok(genres)
    }

    async fn attach_genres(&self, mut books: Vec<Book>) -> AppResult<Vec<Book>> {
        if books.is_empty() {
            return Ok(books);
        }
        let ids: Vec<i32> = books.iter().map(|b| b.id).collect();
        let mut genres = self.genres_for_books(&ids).await?;
        for book in &mut books {
            book.genres = genres.remove(&book.id).unwrap_or_default();
        }
        Ok(books)
    }

    /// Create a book and its genre associations
    pub async fn create(&self, book: &BookForm) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, author_id, summary, isbn, language_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(book.title.trim())
        .bind(book.author_id)
        .bind(book.summary.trim())
        .bind(book.isbn.trim())
        .bind(book.language_id)
        .fetch_one(&mut *tx)
        .await?;

        Self::set_genres(&mut tx, id, &book.genre_ids).await?;
        tx.commit().await?;

        self.get_by_id(id).await
    }

    /// Replace a book's fields and genre associations
    pub async fn update(&self, id: i32, book: &BookForm) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $1, author_id = $2, summary = $3, isbn = $4, language_id = $5
            WHERE id = $6
            "#,
        )
        .bind(book.title.trim())
        .bind(book.author_id)
        .bind(book.summary.trim())
        .bind(book.isbn.trim())
        .bind(book.language_id)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        Self::set_genres(&mut tx, id, &book.genre_ids).await?;
        tx.commit().await?;

        self.get_by_id(id).await
    }

    async fn set_genres(
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
        genre_ids: &[i32],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut **tx)
            .await?;

        if !genre_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO book_genres (book_id, genre_id)
                SELECT $1, g FROM UNNEST($2::int[]) AS g
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(book_id)
            .bind(genre_ids)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    /// Delete a book. Its copies are kept with no book.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }
}
