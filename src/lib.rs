pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use crate::services::{
    repo::VacancyRepo, vacancy_service::VacancyService, vacancy_writer::VacancyWriter,
};
use crate::utils::cancel::Cancellation;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct AppState {
    pub vacancies: Arc<dyn VacancyRepo>,
    pub vacancy_writer: VacancyWriter,
    pub request_timeout: Duration,
    /// Parent of every per-request cancellation; fired when the shutdown
    /// grace period runs out.
    pub abort: CancellationToken,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();
        Self::with_repo(
            Arc::new(VacancyService::new(pool)),
            config.write_attempts,
            config.request_timeout,
        )
    }

    pub fn with_repo(
        repo: Arc<dyn VacancyRepo>,
        write_attempts: u32,
        request_timeout: Duration,
    ) -> Self {
        let vacancy_writer = VacancyWriter::new(repo.clone(), write_attempts);

        Self {
            vacancies: repo,
            vacancy_writer,
            request_timeout,
            abort: CancellationToken::new(),
        }
    }

    pub fn cancellation(&self) -> Cancellation {
        Cancellation::new(self.abort.child_token()).with_timeout(self.request_timeout)
    }
}
