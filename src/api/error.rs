use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::response::PrettyJson;
use crate::models::ErrorRecord;
use crate::services::error::ScrapeError;

/// 统一的API错误类型
#[derive(Debug)]
pub enum ApiError {
    /// 票房页面获取失败
    Lookup { movie_id: String, source: ScrapeError },
    /// 内部服务器错误（如处理任务崩溃）
    Internal { movie_id: String, message: String },
}

impl ApiError {
    pub fn lookup(movie_id: impl Into<String>, source: ScrapeError) -> Self {
        ApiError::Lookup {
            movie_id: movie_id.into(),
            source,
        }
    }

    pub fn internal(movie_id: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Internal {
            movie_id: movie_id.into(),
            message: message.into(),
        }
    }

    pub fn movie_id(&self) -> &str {
        match self {
            ApiError::Lookup { movie_id, .. } | ApiError::Internal { movie_id, .. } => movie_id,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Lookup { source, .. } => write!(f, "{}", source),
            ApiError::Internal { message, .. } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ApiError {}

/// 实现IntoResponse，将错误转换为 500 错误记录
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Lookup { movie_id, source } => {
                tracing::error!("Lookup failed for {}: {}", movie_id, source);
            }
            ApiError::Internal { movie_id, message } => {
                tracing::error!("Internal error for {}: {}", movie_id, message);
            }
        }

        let record = ErrorRecord::new(self.movie_id(), self.to_string());
        PrettyJson::with_status(StatusCode::INTERNAL_SERVER_ERROR, record).into_response()
    }
}

/// Result类型别名
pub type ApiResult<T> = Result<T, ApiError>;
