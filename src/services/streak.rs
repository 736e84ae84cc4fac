//! Streak Engine
//!
//! # Interview Q&A
//!
//! Q: 스트릭 신호가 두 군데인데 어느 쪽이 기준인가?
//! A: 퀴즈/메모리 기록의 타임스탬프에서 직접 유도한 날짜가 기준
//!    - daily_activity 집계는 지급 경로가 누락되면 실제 활동과 어긋날 수 있음
//!    - 기록 테이블은 append-only라서 desync가 불가능
//!    - daily_activity는 주간 캘린더/최장 스트릭처럼 싼 조회가 필요한 곳에만 사용
//!
//! Q: "오늘 활동이 없으면 스트릭은 0인가?"
//! A: 아니다. 최근 활동일이 오늘 또는 어제면 스트릭은 살아있음.
//!    그제 이전이면 끊긴 것으로 보고 0.
//!
//! # Timezone
//!
//! 달력 날짜는 전부 UTC 기준. DB 쿼리도 `AT TIME ZONE 'UTC'`로 캐스팅하고,
//! 호출부는 `Utc::now().date_naive()`를 오늘로 넘긴다.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::db::ActivityStore;

/// 스트릭 정보 응답
#[derive(Debug, Clone, Serialize)]
pub struct StreakInfo {
    /// 연속 활동일 수 (오늘/어제 기준으로 살아있는 경우만)
    pub current_streak: u32,
    /// 역대 최장 연속 활동일 수
    pub longest_streak: u32,
    /// 가장 최근 활동 날짜 (활동 없으면 null)
    pub last_activity_date: Option<NaiveDate>,
    /// 최근 7일 활동 여부, 과거→오늘 순 7칸
    pub weekly_calendar: Vec<bool>,
    /// 활동한 총 날짜 수
    pub total_active_days: u32,
}

// ============ Pure: Date Walks ============

/// 현재 스트릭
///
/// `dates_desc`는 중복 없는 활동 날짜, 최신순.
/// 최근 활동일이 오늘도 어제도 아니면 0 (끊김).
/// 살아있으면 1에서 시작해 하루씩 역방향으로 걷고, 첫 간극에서 종료.
pub fn current_streak(dates_desc: &[NaiveDate], today: NaiveDate) -> u32 {
    let Some(&latest) = dates_desc.first() else {
        return 0;
    };

    let yesterday = today - Duration::days(1);
    if latest != today && latest != yesterday {
        return 0;
    }

    let mut streak = 1;
    let mut cursor = latest;
    for &date in &dates_desc[1..] {
        if date == cursor - Duration::days(1) {
            streak += 1;
            cursor = date;
        } else {
            break;
        }
    }

    streak
}

/// 최장 스트릭
///
/// `dates_asc`는 오름차순 날짜. 정확히 하루 차이만 run을 이어가고,
/// 그 외 간극은 길이 1의 새 run 시작. 활동 없으면 0.
pub fn longest_streak(dates_asc: &[NaiveDate]) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;

    for &date in dates_asc {
        run = match prev {
            Some(p) if date == p + Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(date);
    }

    longest
}

/// 주간 캘린더 — 최근 7일, 과거가 먼저 오고 오늘이 마지막
pub fn weekly_calendar(daily_dates: &[NaiveDate], today: NaiveDate) -> Vec<bool> {
    (0..7)
        .rev()
        .map(|offset| daily_dates.contains(&(today - Duration::days(offset))))
        .collect()
}

// ============ Composition ============

/// 스트릭 정보 조회
///
/// 현재 스트릭과 last_activity_date는 기록 테이블(1차 근거)에서,
/// 캘린더/최장/총 활동일은 daily_activity에서 유도
pub async fn streak_info(
    store: &dyn ActivityStore,
    user_id: &str,
    today: NaiveDate,
) -> anyhow::Result<StreakInfo> {
    let attempt_dates = store.attempt_activity_dates(user_id).await?;
    let daily_dates = store.daily_activity_dates(user_id).await?;

    Ok(StreakInfo {
        current_streak: current_streak(&attempt_dates, today),
        longest_streak: longest_streak(&daily_dates),
        last_activity_date: attempt_dates.first().copied(),
        weekly_calendar: weekly_calendar(&daily_dates, today),
        total_active_days: daily_dates.len() as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockActivityStore;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn today() -> NaiveDate {
        d("2024-03-20")
    }

    fn days_ago(n: i64) -> NaiveDate {
        today() - Duration::days(n)
    }

    #[test]
    fn test_current_streak_walks_until_gap() {
        // {오늘, 어제, 그제, 5일 전} → 간극 전까지 3
        let dates = vec![today(), days_ago(1), days_ago(2), days_ago(5)];
        assert_eq!(current_streak(&dates, today()), 3);
    }

    #[test]
    fn test_current_streak_expired() {
        // 최근 활동이 그제 → 끊김
        let dates = vec![days_ago(2), days_ago(3)];
        assert_eq!(current_streak(&dates, today()), 0);
    }

    #[test]
    fn test_current_streak_alive_from_yesterday() {
        // 오늘 아직 활동 안 했어도 어제까지의 연속은 유지
        let dates = vec![days_ago(1), days_ago(2)];
        assert_eq!(current_streak(&dates, today()), 2);
    }

    #[test]
    fn test_current_streak_empty() {
        assert_eq!(current_streak(&[], today()), 0);
    }

    #[test]
    fn test_current_streak_single_today() {
        assert_eq!(current_streak(&[today()], today()), 1);
    }

    #[test]
    fn test_longest_streak_max_run() {
        let dates = vec![
            d("2024-01-01"),
            d("2024-01-02"),
            d("2024-01-03"),
            d("2024-01-10"),
            d("2024-01-11"),
        ];
        assert_eq!(longest_streak(&dates), 3);
    }

    #[test]
    fn test_longest_streak_empty() {
        assert_eq!(longest_streak(&[]), 0);
    }

    #[test]
    fn test_longest_streak_no_consecutive() {
        let dates = vec![d("2024-01-01"), d("2024-01-05"), d("2024-01-09")];
        assert_eq!(longest_streak(&dates), 1);
    }

    #[test]
    fn test_weekly_calendar_positions() {
        // 오늘 + 3일 전 활동 → [F,F,F,T,F,F,T] (과거→오늘)
        let daily = vec![today(), days_ago(3)];
        assert_eq!(
            weekly_calendar(&daily, today()),
            vec![false, false, false, true, false, false, true]
        );
    }

    #[test]
    fn test_weekly_calendar_ignores_older_dates() {
        let daily = vec![days_ago(10)];
        assert_eq!(weekly_calendar(&daily, today()), vec![false; 7]);
    }

    #[tokio::test]
    async fn test_streak_info_composes_both_sources() {
        // 현재 스트릭은 attempt 날짜에서, 캘린더/최장은 daily에서
        let store = MockActivityStore::new(
            vec![today(), days_ago(1)],
            vec![days_ago(1), days_ago(2), days_ago(3)],
        );

        let info = streak_info(&store, "user-1", today()).await.unwrap();
        assert_eq!(info.current_streak, 2);
        assert_eq!(info.longest_streak, 3);
        assert_eq!(info.last_activity_date, Some(today()));
        assert_eq!(info.total_active_days, 3);
        assert_eq!(
            info.weekly_calendar,
            vec![false, false, false, true, true, true, false]
        );
    }

    #[tokio::test]
    async fn test_streak_info_no_activity() {
        let store = MockActivityStore::new(vec![], vec![]);
        let info = streak_info(&store, "user-1", today()).await.unwrap();
        assert_eq!(info.current_streak, 0);
        assert_eq!(info.longest_streak, 0);
        assert_eq!(info.last_activity_date, None);
        assert_eq!(info.weekly_calendar, vec![false; 7]);
    }
}
