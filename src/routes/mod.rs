//! API Routes Module
//!
//! 모든 HTTP 엔드포인트 정의
//!
//! # Routes
//! - `/health` - 헬스 체크
//! - `/users/*` - 사용자 동기화/조회
//! - `/xp/*` - XP 지급, 레벨 정보, 원장 히스토리
//! - `/streak` - 스트릭 조회 / 일별 활동 갱신
//! - `/stats/*` - 대시보드 요약
//! - `/quizzes/*` - 퀴즈 시도 기록 (+ XP 지급)
//! - `/memory/*` - 메모리 게임 기록 (+ XP 지급)
//! - `/progress` - 모듈 진행도

pub mod health;
pub mod memory;
pub mod progress;
pub mod quizzes;
pub mod stats;
pub mod streak;
pub mod users;
pub mod xp;
