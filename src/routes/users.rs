//! User Endpoints
//!
//! 계정 생성은 identity provider 책임. 여기서는 검증된 토큰으로
//! 로컬 사용자 행을 동기화하고 조회만 한다.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::services::CurrentUser;
use crate::{error::ApiError, AppState};

// ============ Response Types ============

/// 사용자 응답
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub uid: String,
    pub email: String,
    pub name: Option<String>,
    pub total_xp: i64,
    pub current_level: i32,
    pub created_at: String,
}

// ============ Handlers ============

/// POST /users/sync
///
/// 검증된 토큰의 계정 정보로 사용자 행 upsert.
/// 첫 로그인 직후 클라이언트가 호출 — 이후 XP 지급이 NotFound 없이 동작.
pub async fn sync_user(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
) -> Result<Json<UserResponse>, ApiError> {
    // provider가 이메일을 안 주는 경우(익명 로그인 등)는 uid 기반 placeholder
    let email = auth
        .email
        .unwrap_or_else(|| format!("{}@users.ensenas.app", auth.uid));

    let user = state
        .db
        .upsert_user(&auth.uid, &email, auth.name.as_deref())
        .await?;

    Ok(Json(UserResponse {
        uid: user.uid,
        email: user.email,
        name: user.name,
        total_xp: user.total_xp,
        current_level: user.current_level,
        created_at: user.created_at.to_rfc3339(),
    }))
}

/// GET /users/me
///
/// 현재 사용자 조회
pub async fn get_me(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .db
        .get_user(&auth.uid)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {}", auth.uid)))?;

    Ok(Json(UserResponse {
        uid: user.uid,
        email: user.email,
        name: user.name,
        total_xp: user.total_xp,
        current_level: user.current_level,
        created_at: user.created_at.to_rfc3339(),
    }))
}
