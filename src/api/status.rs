use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
};
use serde_json::{json, Value};

use super::response::{html, success};
use super::AppState;

/// 手动查询用的前端页面
const INDEX_PAGE: &str = include_str!("../../static/index.html");

fn usage() -> Value {
    let version = env!("CARGO_PKG_VERSION");
    json!({
        "message": format!("🎬 猫眼电影数据API - v{}", version),
        "version": version,
        "status": "🚀 生产就绪",
        "endpoints": {
            "/api/movie/:id": "获取完整电影数据",
            "/api/status": "API服务状态"
        },
        "examples": {
            "movie": "/api/movie/1413252"
        }
    })
}

fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|accept| accept.contains("text/html"))
        .unwrap_or(false)
}

/// 首页：浏览器访问返回前端页面，其余返回使用说明
pub async fn index(headers: HeaderMap) -> Response {
    if wants_html(&headers) {
        html(INDEX_PAGE)
    } else {
        success(usage()).into_response()
    }
}

/// 未匹配的路径
pub async fn fallback() -> impl IntoResponse {
    success(usage())
}

/// 服务状态
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let source = state.movie_service.source();
    success(json!({
        "status": "ok",
        "service": "maoyan-box-office",
        "version": env!("CARGO_PKG_VERSION"),
        "uptimeSecs": state.started_at.elapsed().as_secs(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "cache": state.movie_service.cache().stats(),
        "upstreams": {
            "page": source.page_host(),
            "api": source.api_host()
        }
    }))
}
