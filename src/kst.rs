//! 한국 표준시(KST, UTC+9) 고정 시간대 유틸리티
//!
//! 피드의 날짜는 모두 KST 기준 달력 날짜입니다.
//! 서버 로컬 시간대는 절대 사용하지 않습니다.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

lazy_static::lazy_static! {
    /// Asia/Seoul. 서머타임이 없으므로 고정 오프셋으로 충분
    pub static ref KST: FixedOffset = FixedOffset::east_opt(9 * 3600).unwrap();
}

/// 오프셋 없는 타임스탬프 포맷 (KST로 간주)
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// 현재 시각 (KST)
pub fn now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&*KST)
}

/// 주어진 시각의 KST 달력 날짜 (KST 자정 기준). 입력의 오프셋은 무관
pub fn date_at<Tz: TimeZone>(instant: &DateTime<Tz>) -> NaiveDate {
    instant.with_timezone(&*KST).date_naive()
}

/// 타임스탬프 문자열을 KST 시각으로 변환
///
/// RFC 3339(오프셋 포함)를 우선 시도하고, 오프셋이 없으면 KST 현지 시각으로 해석합니다.
/// 해석할 수 없으면 `None`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&*KST));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .and_then(|naive| KST.from_local_datetime(&naive).single())
}
