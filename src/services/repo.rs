use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::candidate::Candidate;
use crate::models::vacancy::Vacancy;

/// Persistence contract for the vacancy aggregate.
///
/// Every call is a single attempt: writes are applied in one transaction or
/// not at all, and nothing here retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VacancyRepo: Send + Sync {
    /// Header plus skills, or `Error::NotFound`.
    async fn get_by_id(&self, id: Uuid) -> Result<Vacancy>;

    /// Every vacancy, most recently updated first, skills attached.
    async fn list(&self) -> Result<Vec<Vacancy>>;

    /// Inserts a new aggregate under `id`, which replaces whatever id the
    /// value carries. Stamps `created` and `updated`.
    async fn create(&self, id: Uuid, vacancy: Vacancy) -> Result<Vacancy>;

    /// Replaces the header and the whole skill set of `vacancy.id`.
    async fn update(&self, vacancy: Vacancy) -> Result<Vacancy>;
}

#[async_trait]
pub trait CandidateRepo: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Candidate>;
    async fn list(&self, vacancy_id: Uuid) -> Result<Vec<Candidate>>;
    async fn create(&self, candidate: Candidate) -> Result<Candidate>;
    async fn update(&self, candidate: Candidate) -> Result<Candidate>;
}
