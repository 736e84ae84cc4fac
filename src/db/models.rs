//! Database Models
//!
//! Row types for the gamification store. Users carry cached level state;
//! attempts and XP transactions are append-only facts.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// 사용자
#[derive(Debug, Clone, FromRow)]
pub struct User {
    /// Identity provider가 발급한 uid (불투명 문자열)
    pub uid: String,

    pub email: String,

    pub name: Option<String>,

    /// 누적 XP — 단조 비감소
    pub total_xp: i64,

    /// 캐시된 레벨 (1-50)
    /// 불변식: current_level == level_from_xp(total_xp)
    pub current_level: i32,

    pub created_at: DateTime<Utc>,
}

/// XP 트랜잭션 (append-only 원장)
#[derive(Debug, Clone, FromRow)]
pub struct XpTransaction {
    pub id: i64,

    pub user_id: String,

    /// 지급량 — 0 가능, 음수 불가
    pub amount: i64,

    /// quiz | memory_game | lesson | streak_bonus | achievement
    pub source: String,

    /// 출처 레코드 참조 (attempt id 등)
    pub source_id: Option<i64>,

    pub description: Option<String>,

    /// insert 시점 고정, 이후 변경 없음
    pub created_at: DateTime<Utc>,
}

/// 일별 활동 집계
/// (user_id, activity_date)당 최대 1행 — UNIQUE 제약으로 보장
#[derive(Debug, Clone, FromRow)]
pub struct DailyActivity {
    pub id: i64,
    pub user_id: String,
    pub activity_date: NaiveDate,
    pub quizzes_completed: i32,
    pub lessons_completed: i32,
    pub memory_games_completed: i32,
    pub xp_earned: i64,
    pub created_at: DateTime<Utc>,
}

/// 퀴즈 시도 기록 (불변)
#[derive(Debug, Clone, FromRow)]
pub struct QuizAttempt {
    pub id: i64,
    pub user_id: String,
    pub score: i32,
    pub total: i32,
    pub duration_ms: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// 메모리 게임 기록 (불변)
#[derive(Debug, Clone, FromRow)]
pub struct MemoryRun {
    pub id: i64,
    pub user_id: String,
    pub matches: i32,
    pub attempts: i32,
    pub duration_ms: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// 모듈별 진행도
#[derive(Debug, Clone, FromRow)]
pub struct UserModuleProgress {
    pub user_id: String,
    pub module_id: i32,
    /// 0-100
    pub percent: i32,
    /// upsert마다 갱신
    pub last_activity: DateTime<Utc>,
}
