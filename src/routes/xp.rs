//! XP Endpoints
//!
//! XP 지급, 레벨 정보 조회, 원장 히스토리.
//! 지급량은 호출자가 공식으로 계산해서 보냄 (공식 자체는 순수 함수).

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::services::{xp, CurrentUser, UserLevelInfo, XpAwardResponse};
use crate::types::XpSource;
use crate::{error::ApiError, AppState};

// ============ Request/Response Types ============

/// XP 지급 요청
#[derive(Debug, Deserialize)]
pub struct XpAwardRequest {
    /// 지급량 — 0 허용, 음수는 거부
    pub amount: i64,
    pub source: XpSource,
    /// 출처 레코드 참조 (attempt id 등)
    pub source_id: Option<i64>,
    pub description: Option<String>,
}

/// 히스토리 쿼리 파라미터
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub skip: Option<i64>,
    /// 기본 50, 최대 100
    pub limit: Option<i64>,
}

/// 원장 항목 응답
#[derive(Debug, Serialize)]
pub struct XpTransactionResponse {
    pub id: i64,
    pub amount: i64,
    pub source: String,
    pub source_id: Option<i64>,
    pub description: Option<String>,
    pub created_at: String,
}

// ============ Handlers ============

/// POST /xp/award
///
/// XP 지급 — total_xp 증가, 레벨 캐시 갱신, 원장 기록이 한 트랜잭션
pub async fn award_xp(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Json(req): Json<XpAwardRequest>,
) -> Result<Json<XpAwardResponse>, ApiError> {
    let response = xp::award_xp(
        &state.db,
        &auth.uid,
        req.amount,
        req.source,
        req.source_id,
        req.description.as_deref(),
    )
    .await?;

    if response.level_up {
        tracing::info!(
            user_id = %auth.uid,
            level = response.current_level,
            "Level up"
        );
    }

    Ok(Json(response))
}

/// GET /xp/level
///
/// 현재 레벨 정보 조회
pub async fn get_level_info(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
) -> Result<Json<UserLevelInfo>, ApiError> {
    let info = xp::user_level_info(&state.db, &auth.uid).await?;
    Ok(Json(info))
}

/// GET /xp/transactions
///
/// XP 원장 히스토리 (최신순, 페이지네이션)
pub async fn get_transactions(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<XpTransactionResponse>>, ApiError> {
    let skip = query.skip.unwrap_or(0).max(0);
    let limit = query.limit.unwrap_or(50).clamp(1, 100);

    let transactions = state.db.list_xp_transactions(&auth.uid, skip, limit).await?;

    Ok(Json(
        transactions
            .into_iter()
            .map(|t| XpTransactionResponse {
                id: t.id,
                amount: t.amount,
                source: t.source,
                source_id: t.source_id,
                description: t.description,
                created_at: t.created_at.to_rfc3339(),
            })
            .collect(),
    ))
}
