//! Streak Endpoints
//!
//! 스트릭 조회와 일별 활동 갱신.
//! 조회는 읽기 전용이라 지급/기록과 동시에 실행돼도 안전.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::services::{streak, CurrentUser, StreakInfo};
use crate::types::ActivityType;
use crate::{error::ApiError, AppState};

// ============ Request/Response Types ============

/// 일별 활동 갱신 요청
#[derive(Debug, Deserialize)]
pub struct StreakUpdateRequest {
    pub activity_type: ActivityType,
    /// 이날 벌어들인 XP에 누적할 양 (기본 0)
    #[serde(default)]
    pub xp_earned: i64,
}

/// 일별 활동 응답
#[derive(Debug, Serialize)]
pub struct DailyActivityResponse {
    pub activity_date: String,
    pub quizzes_completed: i32,
    pub lessons_completed: i32,
    pub memory_games_completed: i32,
    pub xp_earned: i64,
}

// ============ Handlers ============

/// GET /streak
///
/// 현재/최장 스트릭, 주간 캘린더, 총 활동일
pub async fn get_streak(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
) -> Result<Json<StreakInfo>, ApiError> {
    let today = chrono::Utc::now().date_naive();
    let info = streak::streak_info(state.db.as_ref(), &auth.uid, today).await?;
    Ok(Json(info))
}

/// POST /streak/update
///
/// 오늘의 활동 카운터 증가 (행이 없으면 생성) — 하루 몇 번이든 누적
pub async fn update_daily_activity(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Json(req): Json<StreakUpdateRequest>,
) -> Result<Json<DailyActivityResponse>, ApiError> {
    if req.xp_earned < 0 {
        return Err(ApiError::ValidationError(
            "xp_earned cannot be negative".to_string(),
        ));
    }

    let row = state
        .db
        .upsert_daily_activity(&auth.uid, req.activity_type, req.xp_earned)
        .await?;

    Ok(Json(DailyActivityResponse {
        activity_date: row.activity_date.to_string(),
        quizzes_completed: row.quizzes_completed,
        lessons_completed: row.lessons_completed,
        memory_games_completed: row.memory_games_completed,
        xp_earned: row.xp_earned,
    }))
}
