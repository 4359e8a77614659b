//! 표시용 포맷 함수
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use std::collections::HashMap;

use crate::deriver::Pax3Class;
use crate::kst::KST;

const DAY_NAMES: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];

const NAVER_FLIGHT_URL: &str = "https://flight.naver.com/flights/international";

const PLACEHOLDER: &str = "-";

lazy_static::lazy_static! {
    static ref ORIGIN_NAMES: HashMap<&'static str, &'static str> = maplit::hashmap! {
        "ICN" => "인천",
        "GMP" => "김포",
    };
}

/// "06/07(금)"
pub fn format_date(date: NaiveDate) -> String {
    let day_name = DAY_NAMES[date.weekday().num_days_from_sunday() as usize];
    format!("{:02}/{:02}({})", date.month(), date.day(), day_name)
}

/// "123,456원", 가격이 없으면 "없음"
pub fn format_price(price: Option<i64>) -> String {
    match price {
        Some(price) => format!("{}원", group_thousands(price)),
        None => "없음".to_string(),
    }
}

/// 차트 Y축 라벨 ("52만")
pub fn format_price_axis(price: i64) -> String {
    format!("{}만", (price as f64 / 10_000.0).round() as i64)
}

/// "06/07 14:30" (KST)
pub fn format_date_time(timestamp: Option<&DateTime<FixedOffset>>) -> String {
    match timestamp {
        Some(ts) => ts.with_timezone(&*KST).format("%m/%d %H:%M").to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// 차트 X축 라벨 "6/7 14:30" (KST)
pub fn chart_label(timestamp: Option<&DateTime<FixedOffset>>) -> String {
    match timestamp {
        Some(ts) => {
            let ts = ts.with_timezone(&*KST);
            format!("{}/{} {}", ts.month(), ts.day(), ts.format("%H:%M"))
        }
        None => PLACEHOLDER.to_string(),
    }
}

pub fn format_nights(nights: i64) -> String {
    format!("{}박", nights)
}

pub fn format_pax3(class: Pax3Class) -> String {
    match class {
        Pax3Class::Unknown => "미확인".to_string(),
        Pax3Class::Unavailable => "3석 없음".to_string(),
        Pax3Class::SamePerSeat => "동일".to_string(),
        Pax3Class::Surcharge(diff) => format!("+{}원", group_thousands(diff)),
    }
}

/// 출발지 코드 → 한글 이름. 모르는 코드는 그대로
pub fn origin_name(code: &str) -> &str {
    ORIGIN_NAMES.get(code).copied().unwrap_or(code)
}

/// 네이버 항공권 왕복 검색 링크 (성인 1명, 일반석)
pub fn naver_link(origin: &str, destination: &str, depart_date: NaiveDate, return_date: NaiveDate) -> String {
    let dep = depart_date.format("%Y%m%d");
    let ret = return_date.format("%Y%m%d");
    format!(
        "{}/{}-{}-{}/{}-{}-{}?adult=1&fareType=Y",
        NAVER_FLIGHT_URL, origin, destination, dep, destination, origin, ret
    )
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
