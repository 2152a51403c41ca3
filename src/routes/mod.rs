pub mod docs;
pub mod health;
pub mod vacancy;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{middleware::cors::api_cors, AppState};

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api-docs/openapi.json", get(docs::openapi))
        .route(
            "/vacancies",
            get(vacancy::list_vacancies).post(vacancy::create_vacancy),
        )
        .route(
            "/vacancies/:id",
            get(vacancy::get_vacancy).post(vacancy::update_vacancy),
        )
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(api_cors()),
        )
}
