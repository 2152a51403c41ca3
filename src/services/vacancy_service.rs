use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::{instrument, Span};
use uuid::Uuid;

use crate::error::{is_unique_violation, Error, Result};
use crate::models::vacancy::{Skill, Vacancy};
use crate::services::repo::VacancyRepo;
use crate::utils::time;

const SELECT_VACANCY: &str = r#"
    SELECT id, template_id, title, status, area, department, duties, requirements,
           experience, created, updated
    FROM vacancy.vacancy
"#;

/// Postgres-backed vacancy store.
#[derive(Clone)]
pub struct VacancyService {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct VacancyRecord {
    id: Uuid,
    template_id: Uuid,
    title: String,
    status: String,
    area: String,
    department: String,
    duties: Vec<String>,
    requirements: Vec<String>,
    experience: i64,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct SkillRecord {
    vacancy_id: Uuid,
    title: String,
    important: bool,
}

impl TryFrom<VacancyRecord> for Vacancy {
    type Error = Error;

    fn try_from(value: VacancyRecord) -> Result<Self> {
        let experience = u32::try_from(value.experience).map_err(|_| {
            Error::Internal(format!(
                "vacancy {} has out-of-range experience {}",
                value.id, value.experience
            ))
        })?;

        Ok(Self {
            id: value.id,
            template_id: value.template_id,
            title: value.title,
            status: value.status.parse()?,
            area: value.area,
            department: value.department,
            skills: Vec::new(),
            duties: value.duties,
            requirements: value.requirements,
            experience,
            created: value.created,
            updated: value.updated,
        })
    }
}

impl From<SkillRecord> for Skill {
    fn from(value: SkillRecord) -> Self {
        Self {
            title: value.title,
            important: value.important,
        }
    }
}

impl VacancyService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VacancyRepo for VacancyService {
    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> Result<Vacancy> {
        let record = sqlx::query_as::<_, VacancyRecord>(&format!("{SELECT_VACANCY} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("vacancy {}", id)))?;
        let mut vacancy = Vacancy::try_from(record)?;

        let skills = sqlx::query_as::<_, SkillRecord>(
            "SELECT vacancy_id, title, important FROM vacancy.skill WHERE vacancy_id = $1",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        vacancy.skills = skills.into_iter().map(Skill::from).collect();

        Ok(vacancy)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Vacancy>> {
        let records =
            sqlx::query_as::<_, VacancyRecord>(&format!("{SELECT_VACANCY} ORDER BY updated DESC"))
                .fetch_all(&self.pool)
                .await?;

        let mut vacancies = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());
        for record in records {
            let vacancy = Vacancy::try_from(record)?;
            index.insert(vacancy.id, vacancies.len());
            vacancies.push(vacancy);
        }

        if !vacancies.is_empty() {
            let ids: Vec<Uuid> = index.keys().copied().collect();
            let skills = sqlx::query_as::<_, SkillRecord>(
                "SELECT vacancy_id, title, important FROM vacancy.skill WHERE vacancy_id = ANY($1)",
            )
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;
            attach_skills(&mut vacancies, &index, skills);
        }

        Ok(vacancies)
    }

    #[instrument(skip(self, vacancy))]
    async fn create(&self, id: Uuid, mut vacancy: Vacancy) -> Result<Vacancy> {
        let now = time::now();
        vacancy.id = id;
        vacancy.created = now;
        vacancy.updated = now;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO vacancy.vacancy (
                id, template_id, title, status, area, department,
                duties, requirements, experience, created, updated
            ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11)
            "#,
        )
        .bind(vacancy.id)
        .bind(vacancy.template_id)
        .bind(&vacancy.title)
        .bind(vacancy.status.as_str())
        .bind(&vacancy.area)
        .bind(&vacancy.department)
        .bind(&vacancy.duties)
        .bind(&vacancy.requirements)
        .bind(i64::from(vacancy.experience))
        .bind(vacancy.created)
        .bind(vacancy.updated)
        .execute(&mut *tx)
        .await
        .map_err(|err| {
            if is_unique_violation(&err, "vacancy_pkey") {
                Error::Conflict(format!("vacancy {}", id))
            } else {
                Error::from(err)
            }
        })?;

        insert_skills(&mut tx, vacancy.id, &vacancy.skills).await?;

        tx.commit().await?;
        Ok(vacancy)
    }

    #[instrument(skip_all, fields(id = tracing::field::Empty))]
    async fn update(&self, mut vacancy: Vacancy) -> Result<Vacancy> {
        Span::current().record("id", tracing::field::display(vacancy.id));
        let now = time::now();

        let mut tx = self.pool.begin().await?;

        let stamps: Option<(DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
            r#"
            UPDATE vacancy.vacancy SET
                template_id = $2,
                title = $3,
                status = $4,
                area = $5,
                department = $6,
                duties = $7,
                requirements = $8,
                experience = $9,
                updated = GREATEST($10, created)
            WHERE id = $1
            RETURNING created, updated
            "#,
        )
        .bind(vacancy.id)
        .bind(vacancy.template_id)
        .bind(&vacancy.title)
        .bind(vacancy.status.as_str())
        .bind(&vacancy.area)
        .bind(&vacancy.department)
        .bind(&vacancy.duties)
        .bind(&vacancy.requirements)
        .bind(i64::from(vacancy.experience))
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((created, updated)) = stamps else {
            return Err(Error::NotFound(format!("vacancy {}", vacancy.id)));
        };
        vacancy.created = created;
        vacancy.updated = updated;

        sqlx::query("DELETE FROM vacancy.skill WHERE vacancy_id = $1")
            .bind(vacancy.id)
            .execute(&mut *tx)
            .await?;

        insert_skills(&mut tx, vacancy.id, &vacancy.skills).await?;

        tx.commit().await?;
        Ok(vacancy)
    }
}

async fn insert_skills(
    tx: &mut Transaction<'static, Postgres>,
    vacancy_id: Uuid,
    skills: &[Skill],
) -> Result<()> {
    for skill in skills {
        sqlx::query("INSERT INTO vacancy.skill (vacancy_id, title, important) VALUES ($1,$2,$3)")
            .bind(vacancy_id)
            .bind(&skill.title)
            .bind(skill.important)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

/// Appends each skill row to its parent in result-stream order.
fn attach_skills(
    vacancies: &mut [Vacancy],
    index: &HashMap<Uuid, usize>,
    skills: impl IntoIterator<Item = SkillRecord>,
) {
    for record in skills {
        if let Some(&pos) = index.get(&record.vacancy_id) {
            vacancies[pos].skills.push(Skill::from(record));
        }
    }
}
