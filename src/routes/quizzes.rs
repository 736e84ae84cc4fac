//! Quiz Endpoints
//!
//! 퀴즈 시도 기록 + XP 지급 + 일별 활동 갱신.
//! 점수는 클라이언트가 계산해서 보냄 (문항 카탈로그는 이 코어 범위 밖).

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::services::{xp, CurrentUser, XpAwardResponse};
use crate::types::{ActivityType, XpSource};
use crate::{error::ApiError, AppState};

// ============ Request/Response Types ============

/// 퀴즈 시도 제출
#[derive(Debug, Deserialize)]
pub struct QuizAttemptRequest {
    pub score: i32,
    pub total: i32,
    pub duration_ms: Option<i64>,
    /// 클라이언트 쪽 퀴즈 식별자 (설명에만 기록)
    pub quiz_id: Option<i64>,
}

/// 시도 기록 응답
#[derive(Debug, Serialize)]
pub struct QuizAttemptResponse {
    pub id: i64,
    pub score: i32,
    pub total: i32,
    pub duration_ms: Option<i64>,
    pub created_at: String,
    /// 이 시도로 지급된 XP
    pub xp: XpAwardResponse,
}

/// 히스토리 항목
#[derive(Debug, Serialize)]
pub struct QuizAttemptHistoryItem {
    pub id: i64,
    pub score: i32,
    pub total: i32,
    pub duration_ms: Option<i64>,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

// ============ Handlers ============

/// POST /quizzes/attempt
///
/// # Flow
///
/// 1. 입력 검증 (score/total 음수, score > total 거부)
/// 2. 시도 기록 insert (append-only)
/// 3. 공식으로 XP 계산 후 지급 (source_id = 시도 행 id)
/// 4. 일별 활동 카운터 증가
pub async fn submit_attempt(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Json(req): Json<QuizAttemptRequest>,
) -> Result<Json<QuizAttemptResponse>, ApiError> {
    if req.score < 0 || req.total < 0 {
        return Err(ApiError::ValidationError(
            "score and total cannot be negative".to_string(),
        ));
    }
    if req.score > req.total {
        return Err(ApiError::ValidationError(
            "score cannot exceed total".to_string(),
        ));
    }

    let attempt = state
        .db
        .insert_quiz_attempt(&auth.uid, req.score, req.total, req.duration_ms)
        .await?;

    let amount = xp::xp_for_quiz(req.score, req.total, req.duration_ms);
    let description = match req.quiz_id {
        Some(quiz_id) => format!("Quiz {} ({}/{})", quiz_id, req.score, req.total),
        None => format!("Quiz ({}/{})", req.score, req.total),
    };

    let award = xp::award_xp(
        &state.db,
        &auth.uid,
        amount,
        XpSource::Quiz,
        Some(attempt.id),
        Some(description.as_str()),
    )
    .await?;

    state
        .db
        .upsert_daily_activity(&auth.uid, ActivityType::Quiz, amount)
        .await?;

    Ok(Json(QuizAttemptResponse {
        id: attempt.id,
        score: attempt.score,
        total: attempt.total,
        duration_ms: attempt.duration_ms,
        created_at: attempt.created_at.to_rfc3339(),
        xp: award,
    }))
}

/// GET /quizzes/my-attempts
///
/// 현재 사용자의 시도 히스토리 (최신순)
pub async fn my_attempts(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<QuizAttemptHistoryItem>>, ApiError> {
    let skip = query.skip.unwrap_or(0).max(0);
    let limit = query.limit.unwrap_or(50).clamp(1, 100);

    let attempts = state.db.list_quiz_attempts(&auth.uid, skip, limit).await?;

    Ok(Json(
        attempts
            .into_iter()
            .map(|a| QuizAttemptHistoryItem {
                id: a.id,
                score: a.score,
                total: a.total,
                duration_ms: a.duration_ms,
                created_at: a.created_at.to_rfc3339(),
            })
            .collect(),
    ))
}
