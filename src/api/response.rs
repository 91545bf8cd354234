use axum::{
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// 每个响应都带的 CORS 头
pub fn cors_headers(content_type: &'static str) -> [(HeaderName, &'static str); 4] {
    [
        (header::CONTENT_TYPE, content_type),
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
        (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
    ]
}

/// 缩进格式的 JSON 响应
#[derive(Debug)]
pub struct PrettyJson<T: Serialize> {
    pub status: StatusCode,
    pub body: T,
}

impl<T: Serialize> PrettyJson<T> {
    pub fn ok(body: T) -> Self {
        Self::with_status(StatusCode::OK, body)
    }

    pub fn with_status(status: StatusCode, body: T) -> Self {
        Self { status, body }
    }
}

impl<T: Serialize> IntoResponse for PrettyJson<T> {
    fn into_response(self) -> Response {
        match serde_json::to_string_pretty(&self.body) {
            Ok(json) => (self.status, cors_headers(JSON_CONTENT_TYPE), json).into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize response: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    cors_headers(JSON_CONTENT_TYPE),
                    r#"{"error":"响应序列化失败"}"#,
                )
                    .into_response()
            }
        }
    }
}

/// 辅助函数：200 JSON 响应
pub fn success<T: Serialize>(body: T) -> PrettyJson<T> {
    PrettyJson::ok(body)
}

/// 辅助函数：HTML 页面响应
pub fn html(page: &'static str) -> Response {
    (StatusCode::OK, cors_headers(HTML_CONTENT_TYPE), page).into_response()
}
