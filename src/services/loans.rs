//! Loan management service: outstanding loans and renewals

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        loan, renewal::RenewalForm, BookInstance, Page, PageQuery, PageRequest,
    },
    repository::Repository,
};

pub const LOANS_PER_PAGE: i64 = 10;

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Copies on loan to one user, soonest due first
    pub async fn borrowed_by(
        &self,
        user_id: i32,
        query: &PageQuery,
        today: NaiveDate,
    ) -> AppResult<Page<BookInstance>> {
        self.on_loan(Some(user_id), query, today).await
    }

    /// Every copy on loan, soonest due first
    pub async fn all_borrowed(&self, query: &PageQuery, today: NaiveDate) -> AppResult<Page<BookInstance>> {
        self.on_loan(None, query, today).await
    }

    async fn on_loan(
        &self,
        borrower_id: Option<i32>,
        query: &PageQuery,
        today: NaiveDate,
    ) -> AppResult<Page<BookInstance>> {
        let request = PageRequest::new(query, LOANS_PER_PAGE)?;
        let total = self.repository.book_instances.count_on_loan(borrower_id).await?;
        request.check_in_range(total)?;
        let instances = self
            .repository
            .book_instances
            .list_on_loan(borrower_id, request)
            .await?
            .into_iter()
            .map(|instance| instance.with_overdue(today))
            .collect();
        Ok(Page::new(instances, total, request))
    }

    /// Renewal form for a copy, pre-filled three weeks ahead
    pub async fn renewal_form(&self, id: Uuid, today: NaiveDate) -> AppResult<RenewalForm> {
        let instance = self.repository.book_instances.get_by_id(id).await?;
        Ok(RenewalForm::new(instance.with_overdue(today), today))
    }

    /// Move a copy's due-back date. The copy's status is left as it is.
    pub async fn renew(&self, id: Uuid, candidate: NaiveDate, today: NaiveDate) -> AppResult<BookInstance> {
        let instance = self.repository.book_instances.get_by_id(id).await?;
        let due_back = loan::validate_renewal(candidate, today)?;

        let renewed = self.repository.book_instances.set_due_back(id, due_back).await?;
        tracing::info!(
            book_instance_id = %id,
            previous_due_back = ?instance.due_back,
            due_back = %due_back,
            status = %renewed.status,
            "Loan renewed"
        );
        Ok(renewed.with_overdue(today))
    }
}
