//! Stats Endpoints

use axum::{extract::State, Json};

use crate::services::{stats, CurrentUser, StatsSummary};
use crate::{error::ApiError, AppState};

/// GET /stats/summary
///
/// 대시보드 요약 — 정답률, 총 시간, 완료 모듈 수, 오늘 XP 추정, 스트릭.
/// 하위 쿼리 하나라도 실패하면 전체 실패 (부분 응답 없음).
pub async fn get_summary(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
) -> Result<Json<StatsSummary>, ApiError> {
    let today = chrono::Utc::now().date_naive();
    let summary = stats::stats_summary(&state.db, &auth.uid, today).await?;
    Ok(Json(summary))
}
