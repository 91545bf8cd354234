pub mod error;
pub mod movie;
pub mod response;
pub mod status;

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    http::{header, HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};

use crate::services::MovieService;
use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub movie_service: Arc<MovieService>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(movie_service: MovieService) -> Self {
        Self {
            movie_service: Arc::new(movie_service),
            started_at: Instant::now(),
        }
    }
}

/// OPTIONS 预检由 CorsLayer 直接返回空的 200
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// 处理函数崩溃时返回 JSON 错误
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "未知错误".to_string()
    };
    let mut response = ApiError::internal("", message).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status::index))
        .route("/api/status", get(status::status))
        .route("/api/movie/:id", get(movie::get_movie))
        .fallback(status::fallback)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer())
        .with_state(state)
}
