use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::Instrument;
use uuid::Uuid;

use super::error::{ApiError, ApiResult};
use super::response::success;
use super::AppState;

/// 单部影片查询
///
/// 查询在独立任务中执行，任务异常退出时仍返回带 movieId 的错误记录
pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("movie_lookup", %request_id, movie_id = %movie_id);

    let service = state.movie_service.clone();
    let id = movie_id.clone();
    let task = tokio::spawn(async move { service.lookup(&id).await }.instrument(span));

    match task.await {
        Ok(Ok(record)) => Ok(success(record)),
        Ok(Err(e)) => Err(ApiError::lookup(movie_id, e)),
        Err(e) => Err(ApiError::internal(movie_id, format!("处理请求时出错: {}", e))),
    }
}
