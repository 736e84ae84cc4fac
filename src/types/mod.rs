//! Common Types Module
//!
//! 게이미피케이션 도메인 전반에서 사용되는 공통 타입 정의

use serde::{Deserialize, Serialize};

/// XP 지급 출처
///
/// xp_transactions.source 컬럼과 1:1 대응 (snake_case 문자열로 저장)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XpSource {
    Quiz,
    MemoryGame,
    Lesson,
    StreakBonus,
    Achievement,
}

impl XpSource {
    /// DB 바인딩용 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            XpSource::Quiz => "quiz",
            XpSource::MemoryGame => "memory_game",
            XpSource::Lesson => "lesson",
            XpSource::StreakBonus => "streak_bonus",
            XpSource::Achievement => "achievement",
        }
    }
}

/// 일별 활동 카운터 종류
///
/// daily_activity 테이블의 어느 카운터를 증가시킬지 결정
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Quiz,
    Lesson,
    MemoryGame,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Quiz => "quiz",
            ActivityType::Lesson => "lesson",
            ActivityType::MemoryGame => "memory_game",
        }
    }
}

/// 진행률 타입 (0-100 검증)
///
/// 범위 밖 값은 생성 시점에 거부 → 변경 전에 ValidationError로 반환됨
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Percent(i32);

impl Percent {
    pub fn new(value: i32) -> Result<Self, String> {
        if (0..=100).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!("percent must be between 0 and 100, got {}", value))
        }
    }

    pub fn value(&self) -> i32 {
        self.0
    }

    /// 100% 완료 여부 (señas dominadas 집계 기준)
    pub fn is_complete(&self) -> bool {
        self.0 == 100
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xp_source_snake_case() {
        let source: XpSource = serde_json::from_str("\"memory_game\"").unwrap();
        assert_eq!(source, XpSource::MemoryGame);
        assert_eq!(source.as_str(), "memory_game");
    }

    #[test]
    fn test_activity_type_parse() {
        let ty: ActivityType = serde_json::from_str("\"lesson\"").unwrap();
        assert_eq!(ty, ActivityType::Lesson);
    }

    #[test]
    fn test_percent_valid() {
        assert!(Percent::new(0).is_ok());
        assert!(Percent::new(100).unwrap().is_complete());
        assert!(!Percent::new(99).unwrap().is_complete());
    }

    #[test]
    fn test_percent_out_of_range() {
        assert!(Percent::new(-1).is_err());
        assert!(Percent::new(101).is_err());
    }
}
