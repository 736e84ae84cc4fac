//! Database Module
//!
//! # Interview Q&A
//!
//! Q: awardXp의 동시성은 어떻게 보장하는가?
//! A: read-modify-write 금지, 단일 UPDATE 증가문 사용
//!
//!    ```sql
//!    UPDATE users SET total_xp = total_xp + $1 WHERE uid = $2 RETURNING total_xp
//!    ```
//!
//!    - 같은 사용자에 대한 동시 지급은 행 잠금으로 직렬화됨
//!    - N개의 동시 지급(a) → total_xp 정확히 N*a 증가 + 원장 N행
//!    - 레벨 캐시 갱신과 원장 insert는 같은 트랜잭션에 묶임
//!
//! Q: daily_activity의 "오늘 행이 있나 → 생성/증가"는?
//! A: INSERT ... ON CONFLICT DO UPDATE 한 문장
//!    - check-then-insert 경쟁 없음, UNIQUE(user_id, activity_date)로 중복 행 차단
//!    - 하루에 몇 번을 호출해도 카운터가 누적됨 (덮어쓰기 없음)
//!
//! Q: 날짜 기준은?
//! A: 전부 UTC. TIMESTAMPTZ 컬럼을 `AT TIME ZONE 'UTC'`로 캐스팅해서
//!    달력 날짜를 뽑는다. 서버 타임존 설정과 무관하게 동일한 결과.

mod models;
mod repository;

pub use models::*;
pub use repository::ActivityStore;

#[cfg(test)]
pub use repository::mock::MockActivityStore;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::services::xp;
use crate::types::{ActivityType, Percent, XpSource};

/// 퀴즈 집계 합산 결과 (stats용)
#[derive(Debug, Default)]
pub struct QuizTotals {
    pub score_sum: i64,
    pub total_sum: i64,
    pub duration_sum: i64,
}

/// 데이터베이스 연결 및 쿼리 담당
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// 데이터베이스 연결
    ///
    /// # Connection Pool Settings
    ///
    /// - max_connections: 10 (트래픽에 따라 조정)
    /// - min_connections: 1 (idle 시 최소 유지)
    /// - acquire_timeout: 3초 (커넥션 획득 대기)
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(1)
            .acquire_timeout(std::time::Duration::from_secs(3))
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// 마이그레이션 실행
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // ============ Users ============

    /// 사용자 조회
    pub async fn get_user(&self, uid: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT uid, email, name, total_xp, current_level, created_at
            FROM users
            WHERE uid = $1
            "#,
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// 사용자 생성/갱신 (upsert)
    ///
    /// Identity provider가 계정을 만들고, 첫 인증 호출에서 행을 동기화함.
    /// 게이미피케이션 상태(total_xp, current_level)는 건드리지 않음.
    pub async fn upsert_user(&self, uid: &str, email: &str, name: Option<&str>) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (uid, email, name)
            VALUES ($1, $2, $3)
            ON CONFLICT (uid)
            DO UPDATE SET
                email = EXCLUDED.email,
                name = COALESCE(EXCLUDED.name, users.name)
            RETURNING uid, email, name, total_xp, current_level, created_at
            "#,
        )
        .bind(uid)
        .bind(email)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    // ============ XP ============

    /// XP 지급 (원자적)
    ///
    /// total_xp 증가 + 레벨 캐시 갱신 + 원장 insert를 한 트랜잭션으로 처리.
    /// 사용자가 없으면 `Ok(None)` — 아무것도 기록되지 않음 (부분 지급 없음).
    /// 성공 시 증가 후의 total_xp를 반환.
    pub async fn award_xp(
        &self,
        user_id: &str,
        amount: i64,
        source: XpSource,
        source_id: Option<i64>,
        description: Option<&str>,
    ) -> Result<Option<i64>> {
        let mut tx = self.pool.begin().await?;

        // 단일 문장 증가 — 동시 지급이 합산됨
        let new_total: Option<i64> = sqlx::query_scalar(
            "UPDATE users SET total_xp = total_xp + $1 WHERE uid = $2 RETURNING total_xp",
        )
        .bind(amount)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(new_total) = new_total else {
            // 사용자 없음 — tx는 drop 시 롤백
            return Ok(None);
        };

        // 불변식 유지: current_level == level_from_xp(total_xp)
        let new_level = xp::level_from_xp(new_total);
        sqlx::query("UPDATE users SET current_level = $1 WHERE uid = $2")
            .bind(new_level)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        // 원장 기록 — 지급 1회당 정확히 1행
        sqlx::query(
            r#"
            INSERT INTO xp_transactions (user_id, amount, source, source_id, description)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user_id)
        .bind(amount)
        .bind(source.as_str())
        .bind(source_id)
        .bind(description)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(new_total))
    }

    /// XP 트랜잭션 히스토리 (최신순, 페이지네이션)
    pub async fn list_xp_transactions(
        &self,
        user_id: &str,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<XpTransaction>> {
        let transactions = sqlx::query_as::<_, XpTransaction>(
            r#"
            SELECT id, user_id, amount, source, source_id, description, created_at
            FROM xp_transactions
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    // ============ Daily Activity ============

    /// 일별 활동 upsert
    ///
    /// 오늘(UTC) 행이 없으면 해당 카운터 1로 생성, 있으면 카운터 +1과
    /// xp_earned 누적. 한 문장이라 동시 호출에도 중복 행이 생기지 않음.
    pub async fn upsert_daily_activity(
        &self,
        user_id: &str,
        activity: ActivityType,
        xp_earned: i64,
    ) -> Result<DailyActivity> {
        let counter = match activity {
            ActivityType::Quiz => "quizzes_completed",
            ActivityType::Lesson => "lessons_completed",
            ActivityType::MemoryGame => "memory_games_completed",
        };

        let sql = format!(
            r#"
            INSERT INTO daily_activity (user_id, activity_date, {counter}, xp_earned)
            VALUES ($1, (NOW() AT TIME ZONE 'UTC')::date, 1, $2)
            ON CONFLICT (user_id, activity_date)
            DO UPDATE SET
                {counter} = daily_activity.{counter} + 1,
                xp_earned = daily_activity.xp_earned + EXCLUDED.xp_earned
            RETURNING id, user_id, activity_date, quizzes_completed,
                      lessons_completed, memory_games_completed, xp_earned, created_at
            "#
        );

        let row = sqlx::query_as::<_, DailyActivity>(&sql)
            .bind(user_id)
            .bind(xp_earned)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    // ============ Quiz Attempts / Memory Runs ============

    /// 퀴즈 시도 기록
    pub async fn insert_quiz_attempt(
        &self,
        user_id: &str,
        score: i32,
        total: i32,
        duration_ms: Option<i64>,
    ) -> Result<QuizAttempt> {
        let attempt = sqlx::query_as::<_, QuizAttempt>(
            r#"
            INSERT INTO quiz_attempts (user_id, score, total, duration_ms)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, score, total, duration_ms, created_at
            "#,
        )
        .bind(user_id)
        .bind(score)
        .bind(total)
        .bind(duration_ms)
        .fetch_one(&self.pool)
        .await?;

        Ok(attempt)
    }

    /// 퀴즈 시도 히스토리 (최신순)
    pub async fn list_quiz_attempts(
        &self,
        user_id: &str,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<QuizAttempt>> {
        let attempts = sqlx::query_as::<_, QuizAttempt>(
            r#"
            SELECT id, user_id, score, total, duration_ms, created_at
            FROM quiz_attempts
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(attempts)
    }

    /// 메모리 게임 기록
    pub async fn insert_memory_run(
        &self,
        user_id: &str,
        matches: i32,
        attempts: i32,
        duration_ms: Option<i64>,
    ) -> Result<MemoryRun> {
        let run = sqlx::query_as::<_, MemoryRun>(
            r#"
            INSERT INTO memory_runs (user_id, matches, attempts, duration_ms)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, matches, attempts, duration_ms, created_at
            "#,
        )
        .bind(user_id)
        .bind(matches)
        .bind(attempts)
        .bind(duration_ms)
        .fetch_one(&self.pool)
        .await?;

        Ok(run)
    }

    // ============ Progress ============

    /// 모듈 진행도 생성/갱신 (upsert)
    pub async fn upsert_progress(
        &self,
        user_id: &str,
        module_id: i32,
        percent: Percent,
    ) -> Result<UserModuleProgress> {
        let progress = sqlx::query_as::<_, UserModuleProgress>(
            r#"
            INSERT INTO user_module_progress (user_id, module_id, percent, last_activity)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (user_id, module_id)
            DO UPDATE SET
                percent = EXCLUDED.percent,
                last_activity = NOW()
            RETURNING user_id, module_id, percent, last_activity
            "#,
        )
        .bind(user_id)
        .bind(module_id)
        .bind(percent.value())
        .fetch_one(&self.pool)
        .await?;

        Ok(progress)
    }

    /// 사용자의 전체 모듈 진행도
    pub async fn list_progress(&self, user_id: &str) -> Result<Vec<UserModuleProgress>> {
        let rows = sqlx::query_as::<_, UserModuleProgress>(
            r#"
            SELECT user_id, module_id, percent, last_activity
            FROM user_module_progress
            WHERE user_id = $1
            ORDER BY module_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============ Aggregates (stats) ============

    /// 퀴즈 합산 (점수/문항/시간)
    ///
    /// SUM(BIGINT)는 NUMERIC으로 승격되므로 BIGINT로 캐스팅해서 디코딩
    pub async fn quiz_totals(&self, user_id: &str) -> Result<QuizTotals> {
        let (score_sum, total_sum, duration_sum): (Option<i64>, Option<i64>, Option<i64>) =
            sqlx::query_as(
                r#"
                SELECT SUM(score)::BIGINT, SUM(total)::BIGINT, SUM(duration_ms)::BIGINT
                FROM quiz_attempts
                WHERE user_id = $1
                "#,
            )
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(QuizTotals {
            score_sum: score_sum.unwrap_or(0),
            total_sum: total_sum.unwrap_or(0),
            duration_sum: duration_sum.unwrap_or(0),
        })
    }

    /// 메모리 게임 총 플레이 시간 (ms)
    pub async fn memory_duration_total(&self, user_id: &str) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(duration_ms), 0)::BIGINT
            FROM memory_runs
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// 100% 완료한 모듈 수 (señas dominadas)
    pub async fn modules_mastered(&self, user_id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM user_module_progress
            WHERE user_id = $1 AND percent = 100
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// 오늘(UTC)의 퀴즈 점수 합 / 메모리 매치 합
    ///
    /// 대시보드의 "오늘 XP" 추정치 입력값 (원장 조회보다 싼 근사)
    pub async fn today_activity_totals(&self, user_id: &str) -> Result<(i64, i64)> {
        let quiz_score: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(score), 0)::BIGINT
            FROM quiz_attempts
            WHERE user_id = $1
              AND (created_at AT TIME ZONE 'UTC')::date = (NOW() AT TIME ZONE 'UTC')::date
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let memory_matches: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(matches), 0)::BIGINT
            FROM memory_runs
            WHERE user_id = $1
              AND (created_at AT TIME ZONE 'UTC')::date = (NOW() AT TIME ZONE 'UTC')::date
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((quiz_score, memory_matches))
    }
}

/// 스트릭 엔진용 읽기 구현
///
/// 현재 스트릭은 퀴즈/메모리 기록에서 직접 유도한 날짜(1차 근거)를,
/// 주간 캘린더와 최장 스트릭은 daily_activity를 사용한다.
#[async_trait]
impl ActivityStore for Database {
    async fn attempt_activity_dates(&self, user_id: &str) -> Result<Vec<NaiveDate>> {
        // UNION이 중복 제거까지 수행
        let dates: Vec<NaiveDate> = sqlx::query_scalar(
            r#"
            SELECT (created_at AT TIME ZONE 'UTC')::date AS activity_date
            FROM quiz_attempts
            WHERE user_id = $1
            UNION
            SELECT (created_at AT TIME ZONE 'UTC')::date
            FROM memory_runs
            WHERE user_id = $1
            ORDER BY activity_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(dates)
    }

    async fn daily_activity_dates(&self, user_id: &str) -> Result<Vec<NaiveDate>> {
        let dates: Vec<NaiveDate> = sqlx::query_scalar(
            r#"
            SELECT activity_date
            FROM daily_activity
            WHERE user_id = $1
            ORDER BY activity_date ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(dates)
    }
}
