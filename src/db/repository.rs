//! Activity Store Abstraction
//!
//! # Interview Q&A
//!
//! Q: 왜 스트릭 계산만 trait 뒤로 분리했는가?
//! A: 스트릭 엔진은 "날짜 집합 → 스트릭"의 순수 로직인데,
//!    입력 날짜를 Postgres에서 읽어와야 함
//!
//!    - trait로 읽기 경계를 분리하면 DB 없이 시나리오 테스트 가능
//!    - Database가 구현, 테스트는 MockActivityStore가 구현
//!    - 나머지 쿼리(지급, 집계)는 Database에 직접 구현 — 과도한 추상화 방지
//!
//! Q: 두 메서드가 서로 다른 테이블을 읽는 이유는?
//! A: 스트릭 신호가 두 곳에 존재함
//!    - attempt_activity_dates: 퀴즈/메모리 기록에서 직접 유도 (1차 근거)
//!      → 지급 경로가 누락돼도 실제 활동과 어긋나지 않음
//!    - daily_activity_dates: 일별 집계 테이블 (주간 캘린더/최장 스트릭용)
//!      → 날짜별 스캔보다 훨씬 싼 조회

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// 스트릭 엔진이 읽는 활동 날짜 인터페이스
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// 퀴즈/메모리 기록이 1건 이상 있는 날짜 (UTC, 중복 제거, 최신순)
    async fn attempt_activity_dates(&self, user_id: &str) -> Result<Vec<NaiveDate>>;

    /// daily_activity 행이 있는 날짜 (오름차순)
    async fn daily_activity_dates(&self, user_id: &str) -> Result<Vec<NaiveDate>>;
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// 고정 날짜를 돌려주는 테스트용 저장소
    pub struct MockActivityStore {
        pub attempt_dates: Vec<NaiveDate>,
        pub daily_dates: Vec<NaiveDate>,
    }

    impl MockActivityStore {
        pub fn new(mut attempt_dates: Vec<NaiveDate>, mut daily_dates: Vec<NaiveDate>) -> Self {
            // 실제 쿼리와 같은 정렬 보장: attempt는 최신순, daily는 오름차순
            attempt_dates.sort();
            attempt_dates.dedup();
            attempt_dates.reverse();
            daily_dates.sort();
            daily_dates.dedup();
            Self {
                attempt_dates,
                daily_dates,
            }
        }
    }

    #[async_trait]
    impl ActivityStore for MockActivityStore {
        async fn attempt_activity_dates(&self, _user_id: &str) -> Result<Vec<NaiveDate>> {
            Ok(self.attempt_dates.clone())
        }

        async fn daily_activity_dates(&self, _user_id: &str) -> Result<Vec<NaiveDate>> {
            Ok(self.daily_dates.clone())
        }
    }
}
