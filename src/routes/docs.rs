use axum::Json;
use utoipa::OpenApi;

use crate::routes::{health, vacancy};

#[derive(OpenApi)]
#[openapi(
    info(title = "HR API"),
    paths(
        health::health,
        vacancy::list_vacancies,
        vacancy::get_vacancy,
        vacancy::create_vacancy,
        vacancy::update_vacancy,
    )
)]
pub struct ApiDoc;

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
