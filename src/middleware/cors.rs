use std::time::Duration;

use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

pub fn api_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(Any)
        .max_age(Duration::from_secs(3600))
}
