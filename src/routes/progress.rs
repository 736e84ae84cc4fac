//! Progress Endpoints
//!
//! 모듈별 진행도 upsert/조회. percent는 생성 시점에 0-100 검증.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::services::CurrentUser;
use crate::types::Percent;
use crate::{error::ApiError, AppState};

// ============ Request/Response Types ============

/// 진행도 upsert 요청
#[derive(Debug, Deserialize)]
pub struct ProgressUpsertRequest {
    pub module_id: i32,
    pub percent: i32,
}

/// 진행도 응답
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub module_id: i32,
    pub percent: i32,
    pub last_activity: String,
}

// ============ Handlers ============

/// POST /progress
///
/// (user_id, module_id) 진행도 upsert — last_activity는 매번 갱신
pub async fn upsert_progress(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Json(req): Json<ProgressUpsertRequest>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let percent = Percent::new(req.percent).map_err(ApiError::ValidationError)?;

    let progress = state
        .db
        .upsert_progress(&auth.uid, req.module_id, percent)
        .await?;

    Ok(Json(ProgressResponse {
        module_id: progress.module_id,
        percent: progress.percent,
        last_activity: progress.last_activity.to_rfc3339(),
    }))
}

/// GET /progress
///
/// 현재 사용자의 전체 모듈 진행도
pub async fn list_progress(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
) -> Result<Json<Vec<ProgressResponse>>, ApiError> {
    let rows = state.db.list_progress(&auth.uid).await?;

    Ok(Json(
        rows.into_iter()
            .map(|p| ProgressResponse {
                module_id: p.module_id,
                percent: p.percent,
                last_activity: p.last_activity.to_rfc3339(),
            })
            .collect(),
    ))
}
