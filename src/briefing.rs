//! 텍스트 가격 브리핑
//!
//! 구간별 최저가와 같은 일정의 대한항공 가격을 메신저용 평문으로 만듭니다.

use chrono::{DateTime, FixedOffset, Timelike};

use crate::deriver::{classify_pax3_price, parse_flight_segments, select_cheapest_future_week, Pax3Class};
use crate::flight::{FlightDataset, Route};
use crate::format::{format_date, format_pax3, format_price, naver_link, origin_name};

const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━";

pub fn build_briefing(dataset: &FlightDataset, now: DateTime<FixedOffset>, hours: &[u32]) -> String {
    let mut lines = vec![
        format!("✈️ 항공권 가격 브리핑 | {} KST", now.format("%Y-%m-%d %H:%M")),
        String::new(),
    ];

    for route in &dataset.routes {
        push_route(&mut lines, route, now);
    }

    if let Some(next) = next_briefing_hour(now.hour(), hours) {
        lines.push(format!("📊 다음 브리핑: {:02}:00 KST", next));
    }

    lines.join("\n")
}

fn push_route(lines: &mut Vec<String>, route: &Route, now: DateTime<FixedOffset>) {
    lines.push(format!("📍 {} → {} (직항)", origin_name(&route.origin), route.label));
    lines.push(DIVIDER.to_string());

    let best = match select_cheapest_future_week(route, now.date_naive()) {
        Some(best) => best,
        None => {
            lines.push("   데이터 없음 (스캔 대기 중)".to_string());
            lines.push(String::new());
            return;
        }
    };

    let depart = format_date(best.depart_date);
    let ret = format_date(best.return_date);
    let legs = parse_flight_segments(&best.flight_info);

    lines.push(format!("🏆 최저가: {} → {} | {}", depart, ret, best.airline));
    lines.push(format!("   ↗ 가는편: {}", legs.outbound));
    lines.push(format!("   ↙ 오는편: {}", legs.inbound));
    lines.push(format!("   💰 왕복 {}", format_price(Some(best.min_price))));
    match classify_pax3_price(best.min_price, best.pax3_price) {
        Pax3Class::Unknown => {}
        class => lines.push(format!("   👥 3인: {}", format_pax3(class))),
    }
    lines.push(format!(
        "   🔗 <{}>",
        naver_link(&route.origin, &route.destination, best.depart_date, best.return_date)
    ));
    lines.push(String::new());

    match (best.kal_price, best.kal_flight_info.as_deref()) {
        (Some(kal_price), Some(kal_info)) => {
            let kal_legs = parse_flight_segments(kal_info);
            lines.push(format!("🇰🇷 대한항공: {} → {}", depart, ret));
            lines.push(format!("   ↗ 가는편: {}", kal_legs.outbound));
            lines.push(format!("   ↙ 오는편: {}", kal_legs.inbound));
            lines.push(format!("   💰 왕복 {}", format_price(Some(kal_price))));
        }
        _ => lines.push("🇰🇷 대한항공: 해당 시간대 KAL 없음".to_string()),
    }
    lines.push(String::new());
}

/// 현재 시각 이후 첫 브리핑 시각. 오늘 남은 시각이 없으면 다음 날 첫 시각
pub fn next_briefing_hour(now_hour: u32, hours: &[u32]) -> Option<u32> {
    let mut sorted = hours.to_vec();
    sorted.sort_unstable();
    sorted
        .iter()
        .copied()
        .find(|&hour| hour > now_hour)
        .or_else(|| sorted.first().copied())
}
