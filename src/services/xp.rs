//! XP Engine
//!
//! # Interview Q&A
//!
//! Q: 레벨 커브는 어떻게 설계됐는가?
//! A: 지수형 단조 증가 커브, 레벨 1-50 고정
//!
//!    공식: xp_required_for_level(L) = floor(100 * (L-1)^1.5)
//!    - 레벨 1: 0 XP, 레벨 2: 100, 레벨 3: 282, 레벨 50: 34300
//!    - 레벨 50이 상한 — 그 이상의 커브는 존재하지 않음
//!
//! Q: 순수 함수와 I/O를 왜 분리했는가?
//! A: 커브/공식은 전 입력 구간에서 실패하지 않는 total function
//!    - award_xp 호출 전에 클라이언트/라우트가 미리 계산 가능
//!    - DB 없이 전 구간 단위 테스트 가능
//!    - DB를 만지는 것은 award_xp / user_level_info 두 개의 thin wrapper뿐

use serde::Serialize;

use crate::db::Database;
use crate::error::ApiError;
use crate::types::XpSource;

/// 레벨 상한
pub const MAX_LEVEL: i32 = 50;

// ============ Pure: Level Curve ============

/// 레벨 L 도달에 필요한 누적 XP
///
/// L == 1이면 0, 그 외엔 floor(100 * (L-1)^1.5)
pub fn xp_required_for_level(level: i32) -> i64 {
    if level <= 1 {
        return 0;
    }
    (100.0 * ((level - 1) as f64).powf(1.5)) as i64
}

/// 누적 XP → 레벨 (1-50, 단조 비감소)
///
/// 다음 레벨 임계값을 넘지 못하는 첫 레벨에서 멈추고,
/// 레벨 50 임계값 이상이면 50으로 고정
pub fn level_from_xp(total_xp: i64) -> i32 {
    for level in 1..MAX_LEVEL {
        if total_xp < xp_required_for_level(level + 1) {
            return level;
        }
    }
    MAX_LEVEL
}

/// 레벨 칭호 — 반개구간 [prev, next) 7단계
pub fn level_title(level: i32) -> &'static str {
    if level < 5 {
        "Apprentice"
    } else if level < 10 {
        "Student"
    } else if level < 20 {
        "Practitioner"
    } else if level < 30 {
        "Communicator"
    } else if level < 40 {
        "Expert"
    } else if level < 50 {
        "Master"
    } else {
        "Legend"
    }
}

/// 레벨 정보 응답
#[derive(Debug, Clone, Serialize)]
pub struct UserLevelInfo {
    pub total_xp: i64,
    pub current_level: i32,
    pub level_title: String,
    pub xp_for_current_level: i64,
    pub xp_for_next_level: i64,
    pub current_level_xp: i64,
    pub required_xp: i64,
    /// 현재 레벨 내 진행률 (0.0-1.0, 소수 3자리)
    pub progress: f64,
}

/// 누적 XP로부터 전체 레벨 정보 계산
pub fn level_info(total_xp: i64) -> UserLevelInfo {
    let current_level = level_from_xp(total_xp);
    let xp_for_current_level = xp_required_for_level(current_level);
    let xp_for_next_level = xp_required_for_level(current_level + 1);
    let current_level_xp = total_xp - xp_for_current_level;
    let required_xp = xp_for_next_level - xp_for_current_level;

    // 레벨 50은 무조건 1.0 — 나눗셈 자체를 하지 않음
    let progress = if current_level >= MAX_LEVEL {
        1.0
    } else {
        let raw = (current_level_xp as f64 / required_xp as f64).clamp(0.0, 1.0);
        (raw * 1000.0).round() / 1000.0
    };

    UserLevelInfo {
        total_xp,
        current_level,
        level_title: level_title(current_level).to_string(),
        xp_for_current_level,
        xp_for_next_level,
        current_level_xp,
        required_xp,
        progress,
    }
}

// ============ Pure: XP Formulas ============

/// 퀴즈 XP
///
/// base = score * 10
/// + floor(base * 0.5)  만점 보너스 (score == total, total > 0)
/// + floor(base * 0.25) 30초 미만 완료 보너스
/// 두 보너스는 동시에 적용될 수 있음
pub fn xp_for_quiz(score: i32, total: i32, duration_ms: Option<i64>) -> i64 {
    let base = score as i64 * 10;
    let mut amount = base;

    if score == total && total > 0 {
        amount += (base as f64 * 0.5) as i64;
    }

    if let Some(d) = duration_ms {
        if d < 30_000 {
            amount += (base as f64 * 0.25) as i64;
        }
    }

    amount
}

/// 메모리 게임 XP
///
/// base = matches * 15, attempts <= matches * 1.5이면 +floor(base * 0.3)
pub fn xp_for_memory_game(matches: i32, attempts: i32) -> i64 {
    let base = matches as i64 * 15;

    if attempts as f64 <= matches as f64 * 1.5 {
        base + (base as f64 * 0.3) as i64
    } else {
        base
    }
}

/// 레슨 완료 XP (고정)
pub fn xp_for_lesson() -> i64 {
    25
}

/// 스트릭 보너스 XP — 높은 임계값부터 검사, 첫 매치가 승리
pub fn streak_bonus(streak_days: u32) -> i64 {
    if streak_days >= 50 {
        200
    } else if streak_days >= 30 {
        100
    } else if streak_days >= 14 {
        50
    } else if streak_days >= 7 {
        25
    } else if streak_days >= 3 {
        10
    } else {
        0
    }
}

// ============ Orchestration ============

/// XP 지급 응답
#[derive(Debug, Clone, Serialize)]
pub struct XpAwardResponse {
    pub xp_awarded: i64,
    pub total_xp: i64,
    pub previous_level: i32,
    pub current_level: i32,
    pub level_up: bool,
    pub level_info: UserLevelInfo,
}

/// XP 지급
///
/// 음수 지급량은 변경 전에 거부. 0은 정상 (기록은 남김).
/// 사용자가 없으면 NotFound — 부분 지급 없음.
pub async fn award_xp(
    db: &Database,
    user_id: &str,
    amount: i64,
    source: XpSource,
    source_id: Option<i64>,
    description: Option<&str>,
) -> Result<XpAwardResponse, ApiError> {
    if amount < 0 {
        return Err(ApiError::ValidationError(
            "XP amount cannot be negative".to_string(),
        ));
    }

    let new_total = db
        .award_xp(user_id, amount, source, source_id, description)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {}", user_id)))?;

    // 트랜잭션이 커밋한 값에서 이전/현재 레벨을 유도
    let previous_level = level_from_xp(new_total - amount);
    let current_level = level_from_xp(new_total);

    Ok(XpAwardResponse {
        xp_awarded: amount,
        total_xp: new_total,
        previous_level,
        current_level,
        level_up: current_level > previous_level,
        level_info: level_info(new_total),
    })
}

/// 사용자 레벨 정보 조회
pub async fn user_level_info(db: &Database, user_id: &str) -> Result<UserLevelInfo, ApiError> {
    let user = db
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {}", user_id)))?;

    Ok(level_info(user.total_xp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_starts_at_zero() {
        assert_eq!(xp_required_for_level(1), 0);
        assert_eq!(xp_required_for_level(2), 100);
    }

    #[test]
    fn test_curve_strictly_increasing() {
        for level in 1..MAX_LEVEL {
            assert!(
                xp_required_for_level(level) < xp_required_for_level(level + 1),
                "curve not increasing at level {}",
                level
            );
        }
    }

    #[test]
    fn test_level_from_xp_bounds() {
        assert_eq!(level_from_xp(0), 1);
        assert_eq!(level_from_xp(99), 1);
        assert_eq!(level_from_xp(100), 2);
        // 레벨 50 임계값: 100 * 49^1.5 = 34300
        assert_eq!(level_from_xp(xp_required_for_level(50)), 50);
        assert_eq!(level_from_xp(i64::MAX / 2), 50);
    }

    #[test]
    fn test_level_from_xp_monotonic() {
        let mut prev = 0;
        for total_xp in (0..40_000).step_by(37) {
            let level = level_from_xp(total_xp);
            assert!((1..=MAX_LEVEL).contains(&level));
            assert!(level >= prev, "level decreased at total_xp {}", total_xp);
            prev = level;
        }
    }

    #[test]
    fn test_level_titles_boundaries() {
        assert_eq!(level_title(1), "Apprentice");
        assert_eq!(level_title(4), "Apprentice");
        assert_eq!(level_title(5), "Student");
        assert_eq!(level_title(10), "Practitioner");
        assert_eq!(level_title(20), "Communicator");
        assert_eq!(level_title(30), "Expert");
        assert_eq!(level_title(40), "Master");
        assert_eq!(level_title(50), "Legend");
    }

    #[test]
    fn test_level_info_progress_rounded() {
        // 레벨 1 구간: 0-100, 50 XP → progress 0.5
        let info = level_info(50);
        assert_eq!(info.current_level, 1);
        assert_eq!(info.current_level_xp, 50);
        assert_eq!(info.required_xp, 100);
        assert!((info.progress - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_level_info_cap_no_division() {
        let info = level_info(1_000_000);
        assert_eq!(info.current_level, 50);
        assert_eq!(info.level_title, "Legend");
        assert_eq!(info.progress, 1.0);
    }

    #[test]
    fn test_quiz_xp_with_both_bonuses() {
        // base 50 + 만점 floor(25) + 속도 floor(12.5)=12 = 87
        assert_eq!(xp_for_quiz(5, 5, Some(20_000)), 87);
    }

    #[test]
    fn test_quiz_xp_no_bonuses() {
        assert_eq!(xp_for_quiz(3, 5, None), 30);
        // 30초 정각은 보너스 없음
        assert_eq!(xp_for_quiz(3, 5, Some(30_000)), 30);
    }

    #[test]
    fn test_quiz_xp_zero_total_no_perfect_bonus() {
        // total == 0이면 score == total이어도 만점 보너스 없음
        assert_eq!(xp_for_quiz(0, 0, None), 0);
    }

    #[test]
    fn test_memory_xp_efficiency_bonus() {
        // base 120, 10 <= 12 → +floor(36) = 156
        assert_eq!(xp_for_memory_game(8, 10), 156);
        // 경계값: attempts == matches * 1.5
        assert_eq!(xp_for_memory_game(8, 12), 156);
        assert_eq!(xp_for_memory_game(8, 13), 120);
    }

    #[test]
    fn test_lesson_xp_fixed() {
        assert_eq!(xp_for_lesson(), 25);
    }

    #[test]
    fn test_streak_bonus_thresholds() {
        assert_eq!(streak_bonus(2), 0);
        assert_eq!(streak_bonus(3), 10);
        assert_eq!(streak_bonus(7), 25);
        assert_eq!(streak_bonus(14), 50);
        assert_eq!(streak_bonus(30), 100);
        assert_eq!(streak_bonus(50), 200);
        assert_eq!(streak_bonus(365), 200);
    }
}
