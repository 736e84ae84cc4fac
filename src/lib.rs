//! EnSeñas Gamification API Library
//!
//! # Overview
//!
//! 수어 교육 앱(EnSeñas, LSM)의 게이미피케이션 백엔드.
//! 퀴즈/메모리/레슨 활동 기록에서 XP, 레벨, 스트릭을 유도한다.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                         API                              │
//! │                                                          │
//! │  ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐    │
//! │  │ Routes  │  │Services │  │   DB    │  │  Types  │    │
//! │  └────┬────┘  └────┬────┘  └────┬────┘  └────┬────┘    │
//! │       │            │            │            │          │
//! │       └────────────┴────────────┴────────────┘          │
//! │                         │                                │
//! └─────────────────────────┼────────────────────────────────┘
//!                           │
//!                           ▼
//!              ┌────────────────────────┐
//!              │  PostgreSQL (원장/집계) │
//!              └────────────────────────┘
//! ```
//!
//! 데이터는 한 방향으로 흐른다:
//! 클라이언트 액션 → 활동 원장 append → {XP 엔진, 스트릭 엔진}이 원장을
//! 읽음 → 통계 집계가 합침 → 응답
//!
//! ## Modules
//!
//! - `config`: 환경 설정 관리
//! - `error`: 에러 타입 및 처리
//! - `routes`: HTTP 엔드포인트 핸들러
//! - `services`: 비즈니스 로직 (XP/스트릭/통계 엔진, 토큰 검증)
//! - `db`: 데이터베이스 연동
//! - `types`: 공통 타입 정의

use std::sync::Arc;

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod services;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use db::Database;
pub use error::ApiError;
pub use services::TokenVerifier;

/// 애플리케이션 전역 상태
///
/// 인증 검증기는 trait object로 주입 — 전역 싱글톤 없음
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub token_verifier: Arc<dyn TokenVerifier>,
    pub config: Arc<Config>,
}
