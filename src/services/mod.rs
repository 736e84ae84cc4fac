//! Services Module
//!
//! 게이미피케이션 비즈니스 로직 레이어
//!
//! # Services
//! - `xp`: XP 엔진 (레벨 커브, 지급 공식, 지급 오케스트레이션)
//! - `streak`: 스트릭 엔진 (연속 활동일 계산)
//! - `stats`: 통계 집계 (대시보드 요약)
//! - `auth`: 토큰 검증 (identity provider 경계)

pub mod auth;
pub mod stats;
pub mod streak;
pub mod xp;

pub use auth::{AuthUser, CurrentUser, FirebaseTokenVerifier, InsecureTokenVerifier, TokenVerifier};
pub use stats::StatsSummary;
pub use streak::StreakInfo;
pub use xp::{UserLevelInfo, XpAwardResponse};
