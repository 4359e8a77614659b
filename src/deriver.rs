//! 항공권 가격 뷰모델 계산
//!
//! 피드의 주별 레코드에서 화면마다 필요한 값(최저가, 대한항공 최저가, 같은 출발일의
//! 다른 박수 옵션, 표 정렬, 차트 시리즈)을 만듭니다. 모든 함수는 부수효과가 없고
//! 실패하지 않습니다. "가격 없음"은 `None`/빈 목록으로 표현합니다.

use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;

use crate::flight::{FlightDataset, HistoryEntry, Pax3Price, Route, WeekEntry};

/// 기준일 이후 출발하는 유효 가격 중 최저가
///
/// 동일 가격이면 피드 순서상 먼저 나온 항목.
pub fn select_cheapest_future_week(route: &Route, as_of: NaiveDate) -> Option<&WeekEntry> {
    // min_by_key는 동률일 때 첫 번째 원소를 반환
    future_offers(route, as_of).min_by_key(|week| week.min_price)
}

/// 최저가와 같은 출발일의 다른 귀국일 옵션 (2박 ↔ 3박 비교용)
pub fn find_sibling_duration_option<'a>(
    route: &'a Route,
    best: &WeekEntry,
    as_of: NaiveDate,
) -> Option<&'a WeekEntry> {
    future_offers(route, as_of)
        .find(|week| week.depart_date == best.depart_date && week.return_date != best.return_date)
}

/// 대한항공 가격이 있는 기준일 이후 출발 항목 중 최저가
pub fn select_cheapest_named_carrier_week(route: &Route, as_of: NaiveDate) -> Option<&WeekEntry> {
    route
        .weeks
        .iter()
        .filter(|week| week.departs_on_or_after(as_of))
        .filter_map(|week| week.kal_price.map(|price| (week, price)))
        .min_by_key(|(_, price)| *price)
        .map(|(week, _)| week)
}

/// 박수 (귀국일 - 출발일). 인자를 바꾸면 부호가 바뀜
pub fn compute_nights(depart_date: NaiveDate, return_date: NaiveDate) -> i64 {
    return_date.signed_duration_since(depart_date).num_days()
}

/// 표에 하이라이트할 최저가
pub fn lowest_future_price(route: &Route, as_of: NaiveDate) -> Option<i64> {
    select_cheapest_future_week(route, as_of).map(|week| week.min_price)
}

fn future_offers(route: &Route, as_of: NaiveDate) -> impl Iterator<Item = &WeekEntry> {
    route
        .weeks
        .iter()
        .filter(move |week| week.has_offer() && week.departs_on_or_after(as_of))
}

/// 주별 표 정렬 기준
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    DepartDate,
    MinPrice,
    KalPrice,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::DepartDate => "depart_date",
            SortKey::MinPrice => "min_price",
            SortKey::KalPrice => "kal_price",
        }
    }

    pub fn from_param(param: &str) -> Option<Self> {
        match param {
            "depart_date" => Some(SortKey::DepartDate),
            "min_price" => Some(SortKey::MinPrice),
            "kal_price" => Some(SortKey::KalPrice),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn from_param(param: &str) -> Option<Self> {
        match param {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// 표 정렬 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TableSort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl TableSort {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// 정렬 기준 선택: 같은 기준이면 방향 전환, 새 기준이면 오름차순
    pub fn select(self, key: SortKey) -> Self {
        if self.key == key {
            Self::new(key, self.direction.toggled())
        } else {
            Self::new(key, SortDirection::Asc)
        }
    }
}

/// 기준일 이후 출발 항목을 표 순서로 정렬 (안정 정렬)
///
/// 대한항공 가격이 없는 항목은 방향과 무관하게 항상 맨 뒤.
pub fn sort_weeks_for_table(weeks: &[WeekEntry], as_of: NaiveDate, sort: TableSort) -> Vec<&WeekEntry> {
    let mut rows: Vec<&WeekEntry> = weeks
        .iter()
        .filter(|week| week.departs_on_or_after(as_of))
        .collect();
    rows.sort_by(|a, b| compare_rows(a, b, sort));
    rows
}

fn compare_rows(a: &WeekEntry, b: &WeekEntry, sort: TableSort) -> Ordering {
    match sort.key {
        SortKey::DepartDate => sort.direction.apply(a.depart_date.cmp(&b.depart_date)),
        SortKey::MinPrice => sort.direction.apply(a.min_price.cmp(&b.min_price)),
        SortKey::KalPrice => match (a.kal_price, b.kal_price) {
            (Some(x), Some(y)) => sort.direction.apply(x.cmp(&y)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

/// 가는편/오는편 시간 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlightSegments {
    pub outbound: String,
    pub inbound: String,
}

const SEGMENT_SEPARATOR: &str = " / ";
const SEGMENT_PLACEHOLDER: &str = "-";

/// "ICN0800-NRT1030 / NRT1800-ICN2030" 형태를 가는편/오는편으로 분리
pub fn parse_flight_segments(info: &str) -> FlightSegments {
    let mut parts = info.split(SEGMENT_SEPARATOR);
    FlightSegments {
        outbound: segment_or_placeholder(parts.next()),
        inbound: segment_or_placeholder(parts.next()),
    }
}

fn segment_or_placeholder(part: Option<&str>) -> String {
    match part.map(str::trim) {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => SEGMENT_PLACEHOLDER.to_string(),
    }
}

/// 3인 가격 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "diff", rename_all = "snake_case")]
pub enum Pax3Class {
    /// 조회하지 않음
    Unknown,
    /// 1인 가격은 있으나 3석이 없음
    Unavailable,
    /// 1인 가격과 동일
    SamePerSeat,
    /// 1인당 추가 금액
    Surcharge(i64),
}

/// 1인 최저가 대비 3인 가격 분류. 1인가보다 싼 값은 차액 0으로 취급
///
/// 1인 가격이 없으면(0 이하) 비교 대상이 없으므로 항상 `Unknown`.
pub fn classify_pax3_price(min_price: i64, pax3_price: Pax3Price) -> Pax3Class {
    if min_price <= 0 {
        return Pax3Class::Unknown;
    }
    match pax3_price {
        Pax3Price::Unknown => Pax3Class::Unknown,
        Pax3Price::Unavailable => Pax3Class::Unavailable,
        Pax3Price::Known(price) => match price.saturating_sub(min_price).max(0) {
            0 => Pax3Class::SamePerSeat,
            diff => Pax3Class::Surcharge(diff),
        },
    }
}

/// 주별 데이터가 하나라도 있는 구간 (피드 순서 유지)
pub fn visible_routes(dataset: &FlightDataset) -> impl Iterator<Item = &Route> {
    dataset.routes.iter().filter(|route| !route.weeks.is_empty())
}

/// 차트 한 점
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    /// "M/D HH:MM" (KST)
    pub label: String,
    pub price: i64,
    pub airline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depart_date: Option<NaiveDate>,
}

/// 전체 최저가 추이
pub fn overall_series(route: &Route) -> Vec<ChartPoint> {
    chart_points(&route.overall_history)
}

/// 특정 주의 가격 추이. 없는 키면 빈 목록
pub fn weekly_series(route: &Route, key: &str) -> Vec<ChartPoint> {
    route
        .weekly_history
        .get(key)
        .map(|entries| chart_points(entries))
        .unwrap_or_default()
}

/// 주별 히스토리 키 (날짜순)
pub fn weekly_history_keys(route: &Route) -> Vec<&str> {
    route.weekly_history.keys().map(String::as_str).collect()
}

/// 요청한 주가 있으면 그 주, 없으면 첫 번째 주
pub fn select_weekly_key<'a>(route: &'a Route, requested: Option<&str>) -> Option<&'a str> {
    requested
        .and_then(|key| route.weekly_history.get_key_value(key))
        .map(|(key, _)| key.as_str())
        .or_else(|| route.weekly_history.keys().next().map(String::as_str))
}

fn chart_points(entries: &[HistoryEntry]) -> Vec<ChartPoint> {
    entries
        .iter()
        .map(|entry| ChartPoint {
            label: crate::format::chart_label(entry.snapshot_at.as_ref()),
            price: entry.price,
            airline: entry.airline.clone(),
            depart_date: entry.depart_date,
        })
        .collect()
}

/// 구간 하나에 대해 한 번에 계산한 값들
#[derive(Debug)]
pub struct DerivedRoute<'a> {
    pub route: &'a Route,
    pub best: Option<&'a WeekEntry>,
    pub sibling: Option<&'a WeekEntry>,
    pub best_named_carrier: Option<&'a WeekEntry>,
    pub lowest_price: Option<i64>,
    pub table: Vec<&'a WeekEntry>,
    pub sort: TableSort,
}

pub fn derive_route(route: &Route, as_of: NaiveDate, sort: TableSort) -> DerivedRoute<'_> {
    let best = select_cheapest_future_week(route, as_of);
    let sibling = best.and_then(|best| find_sibling_duration_option(route, best, as_of));

    DerivedRoute {
        route,
        best,
        sibling,
        best_named_carrier: select_cheapest_named_carrier_week(route, as_of),
        lowest_price: lowest_future_price(route, as_of),
        table: sort_weeks_for_table(&route.weeks, as_of, sort),
        sort,
    }
}
