//! Book instances repository for database operations

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{book_instance::BookInstanceInput, BookInstance, LoanStatus, PageRequest},
};

const SELECT_INSTANCE: &str = r#"
    SELECT bi.id, bi.book_id, bi.language_id, bi.imprint, bi.due_back, bi.status, bi.borrower_id,
           b.title AS book_title,
           l.name AS language_name,
           u.username AS borrower_username
    FROM book_instances bi
    LEFT JOIN books b ON bi.book_id = b.id
    LEFT JOIN languages l ON bi.language_id = l.id
    LEFT JOIN users u ON bi.borrower_id = u.id
"#;

/// Copies without a due date sort after every dated copy
const ORDER_BY_DUE_BACK: &str = "ORDER BY bi.due_back ASC NULLS LAST, bi.id";

#[derive(Clone)]
pub struct BookInstancesRepository {
    pool: Pool<Postgres>,
}

impl BookInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book instance by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstance> {
        let query = format!("{} WHERE bi.id = $1", SELECT_INSTANCE);
        sqlx::query_as::<_, BookInstance>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// List one page of every copy, soonest due first
    pub async fn list(&self, page: PageRequest) -> AppResult<Vec<BookInstance>> {
        let query = format!("{} {} LIMIT $1 OFFSET $2", SELECT_INSTANCE, ORDER_BY_DUE_BACK);
        let instances = sqlx::query_as::<_, BookInstance>(&query)
            .bind(page.per_page)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(instances)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Number of copies per status; statuses with no copies are absent
    pub async fn count_by_status(&self) -> AppResult<HashMap<LoanStatus, i64>> {
        let rows: Vec<(LoanStatus, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM book_instances GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().collect())
    }

    /// Every copy of one book
    pub async fn list_by_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let query = format!("{} WHERE bi.book_id = $1 {}", SELECT_INSTANCE, ORDER_BY_DUE_BACK);
        let instances = sqlx::query_as::<_, BookInstance>(&query)
            .bind(book_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(instances)
    }

    /// Copies on loan, optionally restricted to one borrower, soonest due first
    pub async fn list_on_loan(
        &self,
        borrower_id: Option<i32>,
        page: PageRequest,
    ) -> AppResult<Vec<BookInstance>> {
        let query = format!(
            "{} WHERE bi.status = $1 AND ($2::int IS NULL OR bi.borrower_id = $2) {} LIMIT $3 OFFSET $4",
            SELECT_INSTANCE, ORDER_BY_DUE_BACK
        );
        let instances = sqlx::query_as::<_, BookInstance>(&query)
            .bind(LoanStatus::OnLoan)
            .bind(borrower_id)
            .bind(page.per_page)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(instances)
    }

    pub async fn count_on_loan(&self, borrower_id: Option<i32>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM book_instances WHERE status = $1 AND ($2::int IS NULL OR borrower_id = $2)",
        )
        .bind(LoanStatus::OnLoan)
        .bind(borrower_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn create(&self, instance: &BookInstanceInput) -> AppResult<BookInstance> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO book_instances (id, book_id, language_id, imprint, due_back, status, borrower_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(id)
        .bind(instance.book_id)
        .bind(instance.language_id)
        .bind(&instance.imprint)
        .bind(instance.due_back)
        .bind(instance.status)
        .bind(instance.borrower_id)
        .execute(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    pub async fn update(&self, id: Uuid, instance: &BookInstanceInput) -> AppResult<BookInstance> {
        let result = sqlx::query(
            r#"
            UPDATE book_instances
            SET book_id = $1, language_id = $2, imprint = $3, due_back = $4, status = $5, borrower_id = $6
            WHERE id = $7
            "#,
        )
        .bind(instance.book_id)
        .bind(instance.language_id)
        .bind(&instance.imprint)
        .bind(instance.due_back)
        .bind(instance.status)
        .bind(instance.borrower_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        self.get_by_id(id).await
    }

    /// Persist a new due date; nothing else about the copy changes
    pub async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<BookInstance> {
        let result = sqlx::query("UPDATE book_instances SET due_back = $1 WHERE id = $2")
            .bind(due_back)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        Ok(())
    }
}
