//! Memory Game Endpoints
//!
//! 게임 결과 기록이 1차 액션. XP 지급과 일별 활동 갱신은 부수 효과라서
//! 실패해도 기록 자체는 성공해야 함 — 로그 남기고 계속 진행.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::services::{xp, CurrentUser, XpAwardResponse};
use crate::types::{ActivityType, XpSource};
use crate::{error::ApiError, AppState};

// ============ Request/Response Types ============

/// 게임 결과 제출
#[derive(Debug, Deserialize)]
pub struct MemoryRunRequest {
    pub matches: i32,
    pub attempts: i32,
    pub duration_ms: Option<i64>,
}

/// 게임 기록 응답
#[derive(Debug, Serialize)]
pub struct MemoryRunResponse {
    pub id: i64,
    pub matches: i32,
    pub attempts: i32,
    pub duration_ms: Option<i64>,
    pub created_at: String,
    /// XP 지급 결과 — 지급이 실패했으면 null (기록은 성공)
    pub xp: Option<XpAwardResponse>,
}

// ============ Handlers ============

/// POST /memory/attempt
///
/// 게임 결과 저장. 지급 실패는 억제됨:
/// 기록이 남는 것이 우선이고, XP는 원장 조회로 복구 가능한 부수 정보.
pub async fn submit_run(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Json(req): Json<MemoryRunRequest>,
) -> Result<Json<MemoryRunResponse>, ApiError> {
    if req.matches < 0 || req.attempts < 0 {
        return Err(ApiError::ValidationError(
            "matches and attempts cannot be negative".to_string(),
        ));
    }
    if req.attempts < req.matches {
        return Err(ApiError::ValidationError(
            "attempts cannot be less than matches".to_string(),
        ));
    }

    // 1차 액션 — 여기 실패하면 전체 실패
    let run = state
        .db
        .insert_memory_run(&auth.uid, req.matches, req.attempts, req.duration_ms)
        .await?;

    let amount = xp::xp_for_memory_game(req.matches, req.attempts);
    let description = format!("Memory game ({}/{})", req.matches, req.attempts);

    // 부수 효과 — 실패는 로그만 남기고 억제
    let award = match xp::award_xp(
        &state.db,
        &auth.uid,
        amount,
        XpSource::MemoryGame,
        Some(run.id),
        Some(description.as_str()),
    )
    .await
    {
        Ok(response) => Some(response),
        Err(e) => {
            tracing::warn!(
                user_id = %auth.uid,
                run_id = run.id,
                "XP award failed after memory run, suppressing: {:?}",
                e
            );
            None
        }
    };

    if let Err(e) = state
        .db
        .upsert_daily_activity(&auth.uid, ActivityType::MemoryGame, amount)
        .await
    {
        tracing::warn!(
            user_id = %auth.uid,
            run_id = run.id,
            "Daily activity update failed after memory run, suppressing: {:?}",
            e
        );
    }

    Ok(Json(MemoryRunResponse {
        id: run.id,
        matches: run.matches,
        attempts: run.attempts,
        duration_ms: run.duration_ms,
        created_at: run.created_at.to_rfc3339(),
        xp: award,
    }))
}
