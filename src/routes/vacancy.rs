use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    dto::vacancy_dto::ListVacanciesResponse,
    error::{Error, Result},
    models::vacancy::Vacancy,
    AppState,
};

fn vacancy_id(path: std::result::Result<Path<Uuid>, PathRejection>) -> Result<Uuid> {
    path.map(|Path(id)| id)
        .map_err(|rejection| Error::BadRequest(rejection.body_text()))
}

fn vacancy_body(body: std::result::Result<Json<Vacancy>, JsonRejection>) -> Result<Vacancy> {
    body.map(|Json(vacancy)| vacancy)
        .map_err(|rejection| Error::BadRequest(rejection.body_text()))
}

#[utoipa::path(
    get,
    path = "/vacancies",
    responses(
        (status = 200, description = "Vacancies, most recently updated first", body = ListVacanciesResponse)
    )
)]
#[axum::debug_handler]
pub async fn list_vacancies(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let vacancies = state.cancellation().run(state.vacancies.list()).await?;
    Ok(Json(ListVacanciesResponse::from(vacancies)))
}

#[utoipa::path(
    get,
    path = "/vacancies/{id}",
    params(
        ("id" = Uuid, Path, description = "Vacancy ID")
    ),
    responses(
        (status = 200, description = "Vacancy found", body = Vacancy),
        (status = 400, description = "Malformed vacancy ID"),
        (status = 404, description = "Vacancy not found")
    )
)]
#[axum::debug_handler]
pub async fn get_vacancy(
    State(state): State<AppState>,
    path: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse> {
    let id = vacancy_id(path)?;
    let vacancy = state.cancellation().run(state.vacancies.get_by_id(id)).await?;
    Ok(Json(vacancy))
}

#[utoipa::path(
    post,
    path = "/vacancies",
    request_body = Vacancy,
    responses(
        (status = 200, description = "Vacancy created", body = Vacancy),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Vacancy ID already taken"),
        (status = 500, description = "Store failure")
    )
)]
#[axum::debug_handler]
pub async fn create_vacancy(
    State(state): State<AppState>,
    body: std::result::Result<Json<Vacancy>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let vacancy = vacancy_body(body)?;
    let vacancy = state
        .vacancy_writer
        .create(vacancy, &state.cancellation())
        .await?;
    Ok(Json(vacancy))
}

#[utoipa::path(
    post,
    path = "/vacancies/{id}",
    params(
        ("id" = Uuid, Path, description = "Vacancy ID")
    ),
    request_body = Vacancy,
    responses(
        (status = 200, description = "Vacancy replaced", body = Vacancy),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Vacancy not found"),
        (status = 500, description = "Store failure")
    )
)]
#[axum::debug_handler]
pub async fn update_vacancy(
    State(state): State<AppState>,
    path: std::result::Result<Path<Uuid>, PathRejection>,
    body: std::result::Result<Json<Vacancy>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let id = vacancy_id(path)?;
    let mut vacancy = vacancy_body(body)?;
    vacancy.id = id;
    let vacancy = state
        .vacancy_writer
        .update(vacancy, &state.cancellation())
        .await?;
    Ok(Json(vacancy))
}
