//! Stats Aggregator
//!
//! 대시보드 요약 하나로 합치는 레이어. 하위 쿼리 다섯 개 중 하나라도
//! 실패하면 전체 호출이 실패한다 (부분 응답 없음).

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::Database;
use crate::error::ApiError;
use crate::services::streak;

/// 사용자 통계 요약
#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
    /// 전체 퀴즈 정답률 (%), 소수 2자리. 시도 없으면 0.0
    pub precision_global: f64,
    /// 퀴즈 + 메모리 총 플레이 시간 (ms)
    pub total_time_ms: i64,
    /// 100% 완료한 모듈 수
    pub signs_mastered: i64,
    /// 오늘 XP 추정치 — 원장과 무관한 싼 근사 (score*10 + matches*5)
    pub xp_today: i64,
    /// 현재 스트릭 (기록 기반)
    pub current_streak: u32,
}

// ============ Pure helpers ============

/// 전역 정답률 — 100 * Σscore / Σtotal, 소수 2자리
///
/// 시도가 없으면 (Σtotal == 0) 나눗셈 없이 0.0
pub fn precision_global(score_sum: i64, total_sum: i64) -> f64 {
    if total_sum <= 0 {
        return 0.0;
    }
    let raw = (score_sum as f64 / total_sum as f64) * 100.0;
    (raw * 100.0).round() / 100.0
}

/// 오늘 XP 추정 공식
///
/// award 경로의 보너스 포함 공식과 다른, 의도된 근사치.
/// 집계 쿼리 두 번이면 끝나서 대시보드용으로 충분함.
pub fn today_xp_estimate(quiz_score_sum: i64, memory_matches_sum: i64) -> i64 {
    quiz_score_sum * 10 + memory_matches_sum * 5
}

// ============ Composition ============

/// 사용자 통계 요약 조회
pub async fn stats_summary(
    db: &Database,
    user_id: &str,
    today: NaiveDate,
) -> Result<StatsSummary, ApiError> {
    let quiz = db.quiz_totals(user_id).await?;
    let memory_time = db.memory_duration_total(user_id).await?;
    let signs_mastered = db.modules_mastered(user_id).await?;
    let (quiz_score_today, memory_matches_today) = db.today_activity_totals(user_id).await?;
    let streak_info = streak::streak_info(db, user_id, today).await?;

    Ok(StatsSummary {
        precision_global: precision_global(quiz.score_sum, quiz.total_sum),
        total_time_ms: quiz.duration_sum + memory_time,
        signs_mastered,
        xp_today: today_xp_estimate(quiz_score_today, memory_matches_today),
        current_streak: streak_info.current_streak,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_no_attempts() {
        // 0으로 나누지 않고 0.0
        assert_eq!(precision_global(0, 0), 0.0);
    }

    #[test]
    fn test_precision_rounded_two_decimals() {
        // 2/3 → 66.67
        assert_eq!(precision_global(2, 3), 66.67);
        assert_eq!(precision_global(10, 10), 100.0);
    }

    #[test]
    fn test_today_xp_estimate() {
        assert_eq!(today_xp_estimate(0, 0), 0);
        assert_eq!(today_xp_estimate(7, 4), 90);
    }
}
