use std::future::Future;
use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::vacancy::Vacancy;
use crate::services::repo::VacancyRepo;
use crate::utils::cancel::Cancellation;

pub const DEFAULT_WRITE_ATTEMPTS: u32 = 5;

/// Retries vacancy writes that fail with a transient store error.
///
/// Attempts run back to back. Not-found, permanent and cancellation errors
/// are returned from the attempt that produced them.
#[derive(Clone)]
pub struct VacancyWriter {
    repo: Arc<dyn VacancyRepo>,
    max_attempts: u32,
}

impl VacancyWriter {
    pub fn new(repo: Arc<dyn VacancyRepo>, max_attempts: u32) -> Self {
        Self {
            repo,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Creates `vacancy` under one identifier shared by every attempt.
    ///
    /// A retry that finds the identifier taken means an earlier attempt
    /// committed without acknowledgement; the stored aggregate is returned.
    pub async fn create(&self, vacancy: Vacancy, cancel: &Cancellation) -> Result<Vacancy> {
        let id = Uuid::new_v4();
        let mut made = 0;
        self.retry("create", id, cancel, || {
            made += 1;
            let retried = made > 1;
            let repo = self.repo.clone();
            let vacancy = vacancy.clone();
            async move {
                match repo.create(id, vacancy).await {
                    Err(Error::Conflict(_)) if retried => {
                        info!(%id, "vacancy already stored by an earlier attempt");
                        repo.get_by_id(id).await
                    }
                    res => res,
                }
            }
        })
        .await
    }

    pub async fn update(&self, vacancy: Vacancy, cancel: &Cancellation) -> Result<Vacancy> {
        let id = vacancy.id;
        self.retry("update", id, cancel, || self.repo.update(vacancy.clone()))
            .await
    }

    async fn retry<F, Fut>(
        &self,
        op: &'static str,
        id: Uuid,
        cancel: &Cancellation,
        mut attempt: F,
    ) -> Result<Vacancy>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Vacancy>>,
    {
        let mut attempts = 1;
        loop {
            match cancel.run(async { attempt().await }).await {
                Ok(vacancy) => return Ok(vacancy),
                Err(err) if err.is_transient() && attempts < self.max_attempts => {
                    warn!(op, %id, attempt = attempts, error = %err, "vacancy write failed, retrying");
                    attempts += 1;
                }
                Err(err) if err.is_transient() => {
                    error!(op, %id, attempts, error = %err, "vacancy write retries exhausted");
                    return Err(Error::RetryExhausted {
                        attempts,
                        source: Box::new(err),
                    });
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::vacancy::Skill;
    use crate::services::repo::MockVacancyRepo;
    use mockall::predicate::always;
    use std::sync::Mutex;
    use tokio_util::sync::CancellationToken;

    fn transient() -> Error {
        Error::Database(sqlx::Error::PoolTimedOut)
    }

    fn sample() -> Vacancy {
        Vacancy {
            id: Uuid::new_v4(),
            title: "QA engineer".into(),
            skills: vec![Skill::new("Go", true), Skill::new("SQL", false)],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_gives_up_after_the_bound() {
        let mut repo = MockVacancyRepo::new();
        repo.expect_create()
            .times(DEFAULT_WRITE_ATTEMPTS as usize)
            .returning(|_, _| Err(transient()));

        let writer = VacancyWriter::new(Arc::new(repo), DEFAULT_WRITE_ATTEMPTS);
        let err = writer
            .create(sample(), &Cancellation::default())
            .await
            .unwrap_err();

        match err {
            Error::RetryExhausted { attempts, source } => {
                assert_eq!(attempts, DEFAULT_WRITE_ATTEMPTS);
                assert_eq!(source.kind(), ErrorKind::Transient);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn create_reuses_the_identifier_across_attempts() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let caller_id = Uuid::new_v4();

        let mut repo = MockVacancyRepo::new();
        let log = seen.clone();
        repo.expect_create()
            .times(3)
            .returning(move |id, mut vacancy| {
                let mut log = log.lock().unwrap();
                log.push(id);
                if log.len() < 3 {
                    return Err(transient());
                }
                vacancy.id = id;
                Ok(vacancy)
            });

        let writer = VacancyWriter::new(Arc::new(repo), 5);
        let mut input = sample();
        input.id = caller_id;
        let created = writer
            .create(input, &Cancellation::default())
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|id| *id == seen[0]));
        assert_eq!(created.id, seen[0]);
        assert_ne!(created.id, caller_id);
    }

    #[tokio::test]
    async fn create_returns_stored_vacancy_when_an_earlier_attempt_committed() {
        let stored = Arc::new(Mutex::new(None::<Vacancy>));

        let mut repo = MockVacancyRepo::new();
        let mut calls = 0;
        let sink = stored.clone();
        repo.expect_create().times(2).returning(move |id, mut vacancy| {
            calls += 1;
            if calls == 1 {
                vacancy.id = id;
                *sink.lock().unwrap() = Some(vacancy);
                return Err(transient());
            }
            Err(Error::Conflict(format!("vacancy {}", id)))
        });
        let source = stored.clone();
        repo.expect_get_by_id().times(1).returning(move |id| {
            source
                .lock()
                .unwrap()
                .clone()
                .filter(|v| v.id == id)
                .ok_or_else(|| Error::NotFound(format!("vacancy {}", id)))
        });

        let writer = VacancyWriter::new(Arc::new(repo), 5);
        let created = writer
            .create(sample(), &Cancellation::default())
            .await
            .unwrap();

        let stored = stored.lock().unwrap().clone().unwrap();
        assert_eq!(created, stored);
    }

    #[tokio::test]
    async fn conflict_on_first_create_attempt_is_returned() {
        let mut repo = MockVacancyRepo::new();
        repo.expect_create()
            .times(1)
            .returning(|id, _| Err(Error::Conflict(format!("vacancy {}", id))));
        repo.expect_get_by_id().never();

        let writer = VacancyWriter::new(Arc::new(repo), 5);
        let err = writer
            .create(sample(), &Cancellation::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn permanent_failures_are_not_retried() {
        let mut repo = MockVacancyRepo::new();
        repo.expect_update().times(1).returning(|_| {
            Err(Error::InvalidEnum {
                kind: "vacancy status",
                value: "archived".into(),
            })
        });

        let writer = VacancyWriter::new(Arc::new(repo), 5);
        let err = writer
            .update(sample(), &Cancellation::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidEnum { .. }));
    }

    #[tokio::test]
    async fn missing_vacancy_is_not_retried() {
        let mut repo = MockVacancyRepo::new();
        repo.expect_update()
            .with(always())
            .times(1)
            .returning(|v| Err(Error::NotFound(format!("vacancy {}", v.id))));

        let writer = VacancyWriter::new(Arc::new(repo), 5);
        let err = writer
            .update(sample(), &Cancellation::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn update_succeeds_after_transient_failure() {
        let mut repo = MockVacancyRepo::new();
        let mut calls = 0;
        repo.expect_update().times(2).returning(move |v| {
            calls += 1;
            if calls == 1 {
                Err(transient())
            } else {
                Ok(v)
            }
        });

        let writer = VacancyWriter::new(Arc::new(repo), 5);
        let input = sample();
        let updated = writer
            .update(input.clone(), &Cancellation::default())
            .await
            .unwrap();
        assert_eq!(updated, input);
    }

    #[tokio::test]
    async fn cancelled_write_is_never_attempted() {
        let mut repo = MockVacancyRepo::new();
        repo.expect_create().never();

        let token = CancellationToken::new();
        token.cancel();

        let writer = VacancyWriter::new(Arc::new(repo), 5);
        let err = writer
            .create(sample(), &Cancellation::new(token))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }

    #[test]
    fn bound_is_at_least_one() {
        let writer = VacancyWriter::new(Arc::new(MockVacancyRepo::new()), 0);
        assert_eq!(writer.max_attempts(), 1);
    }
}
