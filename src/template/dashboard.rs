use askama::Template;
use chrono::NaiveDate;
use reqwest::Url;

use crate::deriver::{
    classify_pax3_price, compute_nights, derive_route, overall_series, parse_flight_segments,
    select_weekly_key, visible_routes, weekly_series, ChartPoint, DerivedRoute, Pax3Class,
    SortDirection, SortKey, TableSort,
};
use crate::flight::{FlightDataset, Route, WeekEntry};
use crate::format::{
    format_date, format_date_time, format_nights, format_pax3, format_price, format_price_axis,
    naver_link, origin_name,
};

#[derive(Debug, Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub updated_at: String,
    pub routes: Vec<RouteView>,
}

/// 화면 상태 (쿼리 파라미터). `route`로 지정된 구간에만 정렬/주 선택이 적용됨
#[derive(Debug, Clone, Default)]
pub struct DashboardParams {
    pub route: Option<String>,
    pub sort: TableSort,
    pub week: Option<String>,
}

impl DashboardParams {
    fn sort_for(&self, route_key: &str) -> TableSort {
        if self.route.as_deref() == Some(route_key) {
            self.sort
        } else {
            TableSort::default()
        }
    }

    fn week_for(&self, route_key: &str) -> Option<&str> {
        if self.route.as_deref() == Some(route_key) {
            self.week.as_deref()
        } else {
            None
        }
    }
}

#[derive(Debug)]
pub struct RouteView {
    pub key: String,
    pub title: String,
    pub best: Option<OfferView>,
    pub sibling: Option<SiblingView>,
    pub named_carrier: Option<OfferView>,
    pub depart_header: HeaderView,
    pub price_header: HeaderView,
    pub kal_header: HeaderView,
    pub rows: Vec<RowView>,
    pub overall: SeriesView,
    pub weekly: WeeklyView,
}

/// 최저가 카드
#[derive(Debug)]
pub struct OfferView {
    pub price: String,
    pub depart: String,
    pub return_date: String,
    pub nights: String,
    pub airline: String,
    pub outbound: String,
    pub inbound: String,
    pub pax3: Option<String>,
    pub link: String,
}

/// 같은 출발일 다른 박수 옵션
#[derive(Debug)]
pub struct SiblingView {
    pub nights: String,
    pub price: String,
    pub airline: String,
    pub link: String,
}

/// 정렬 가능한 표 헤더
#[derive(Debug)]
pub struct HeaderView {
    pub label: &'static str,
    pub href: String,
    pub indicator: &'static str,
    pub active: bool,
}

#[derive(Debug)]
pub struct RowView {
    pub depart: String,
    pub return_date: String,
    pub nights: String,
    pub nights_class: &'static str,
    pub price: String,
    pub is_lowest: bool,
    pub airline: String,
    pub outbound: String,
    pub inbound: String,
    pub kal_price: String,
    pub pax3: String,
    pub link: String,
}

#[derive(Debug)]
pub struct SeriesView {
    pub points: Vec<ChartPoint>,
    pub axis_min: String,
    pub axis_max: String,
}

impl SeriesView {
    pub fn from_points(points: Vec<ChartPoint>) -> Self {
        let axis_min = points.iter().map(|p| p.price).min();
        let axis_max = points.iter().map(|p| p.price).max();
        Self {
            points,
            axis_min: axis_min.map(format_price_axis).unwrap_or_default(),
            axis_max: axis_max.map(format_price_axis).unwrap_or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn price_text(&self, point: &ChartPoint) -> String {
        format_price(Some(point.price))
    }
}

#[derive(Debug)]
pub struct WeeklyView {
    pub options: Vec<WeekOption>,
    pub series: SeriesView,
}

#[derive(Debug)]
pub struct WeekOption {
    pub label: String,
    pub href: String,
    pub selected: bool,
}

impl DashboardTemplate {
    pub fn build(
        dataset: &FlightDataset,
        params: &DashboardParams,
        as_of: NaiveDate,
    ) -> Self {
        let routes = visible_routes(dataset)
            .map(|route| {
                let key = route.key();
                let derived = derive_route(route, as_of, params.sort_for(&key));
                RouteView::build(&derived, params.week_for(&key))
            })
            .collect();

        Self {
            updated_at: format_date_time(dataset.updated_at.as_ref()),
            routes,
        }
    }
}

impl RouteView {
    fn build(derived: &DerivedRoute<'_>, requested_week: Option<&str>) -> Self {
        let route = derived.route;
        let key = route.key();

        let best = derived.best.map(|week| offer_view(route, week, week.min_price, &week.flight_info));
        let sibling = derived.sibling.map(|week| SiblingView {
            nights: format_nights(compute_nights(week.depart_date, week.return_date)),
            price: format_price(Some(week.min_price)),
            airline: week.airline.clone(),
            link: naver_link(&route.origin, &route.destination, week.depart_date, week.return_date),
        });
        let named_carrier = derived.best_named_carrier.and_then(|week| {
            let price = week.kal_price?;
            let info = week.kal_flight_info.as_deref().unwrap_or_default();
            let mut view = offer_view(route, week, price, info);
            view.pax3 = None;
            Some(view)
        });

        let header = |sort_key: SortKey, label: &'static str| {
            let active = derived.sort.key == sort_key;
            HeaderView {
                label,
                href: dashboard_href(&key, derived.sort.select(sort_key), requested_week),
                indicator: match (active, derived.sort.direction) {
                    (false, _) => "↕",
                    (true, SortDirection::Asc) => "↑",
                    (true, SortDirection::Desc) => "↓",
                },
                active,
            }
        };
        let depart_header = header(SortKey::DepartDate, "출발일");
        let price_header = header(SortKey::MinPrice, "최저가");
        let kal_header = header(SortKey::KalPrice, "KAL");

        let rows = derived
            .table
            .iter()
            .map(|week| row_view(route, week, derived.lowest_price))
            .collect();

        let selected_week = select_weekly_key(route, requested_week);
        let options = route
            .weekly_history
            .keys()
            .map(|week_key| WeekOption {
                label: week_label(week_key),
                href: dashboard_href(&key, derived.sort, Some(week_key)),
                selected: Some(week_key.as_str()) == selected_week,
            })
            .collect();
        let weekly_points = selected_week
            .map(|week_key| weekly_series(route, week_key))
            .unwrap_or_default();

        Self {
            title: format!("{} → {}", origin_name(&route.origin), route.label),
            key,
            best,
            sibling,
            named_carrier,
            depart_header,
            price_header,
            kal_header,
            rows,
            overall: SeriesView::from_points(overall_series(route)),
            weekly: WeeklyView {
                options,
                series: SeriesView::from_points(weekly_points),
            },
        }
    }
}

fn offer_view(route: &Route, week: &WeekEntry, price: i64, flight_info: &str) -> OfferView {
    let legs = parse_flight_segments(flight_info);
    let pax3 = match classify_pax3_price(week.min_price, week.pax3_price) {
        Pax3Class::Unknown => None,
        class => Some(format_pax3(class)),
    };

    OfferView {
        price: format_price(Some(price)),
        depart: format_date(week.depart_date),
        return_date: format_date(week.return_date),
        nights: format_nights(compute_nights(week.depart_date, week.return_date)),
        airline: week.airline.clone(),
        outbound: legs.outbound,
        inbound: legs.inbound,
        pax3,
        link: naver_link(&route.origin, &route.destination, week.depart_date, week.return_date),
    }
}

fn row_view(route: &Route, week: &WeekEntry, lowest_price: Option<i64>) -> RowView {
    let legs = parse_flight_segments(&week.flight_info);
    let nights = compute_nights(week.depart_date, week.return_date);

    RowView {
        depart: format_date(week.depart_date),
        return_date: format_date(week.return_date),
        nights: format_nights(nights),
        nights_class: if nights == 2 { "nights-2" } else { "nights-other" },
        price: if week.has_offer() {
            format_price(Some(week.min_price))
        } else {
            format_price(None)
        },
        is_lowest: week.has_offer() && Some(week.min_price) == lowest_price,
        airline: week.airline.clone(),
        outbound: legs.outbound,
        inbound: legs.inbound,
        kal_price: format_price(week.kal_price),
        pax3: format_pax3(classify_pax3_price(week.min_price, week.pax3_price)),
        link: naver_link(&route.origin, &route.destination, week.depart_date, week.return_date),
    }
}

/// 주별 히스토리 키("2024-06-07") → "출발 06/07(금)"
fn week_label(week_key: &str) -> String {
    match NaiveDate::parse_from_str(week_key, "%Y-%m-%d") {
        Ok(date) => format!("출발 {}", format_date(date)),
        Err(_) => format!("출발 {}", week_key),
    }
}

lazy_static::lazy_static! {
    // 쿼리 인코딩용 기준 URL. 경로와 쿼리만 사용함
    static ref DASHBOARD_URL: Url = Url::parse("http://localhost/dashboard").unwrap();
}

/// 대시보드 상태 링크. 피드에서 온 키는 퍼센트 인코딩됨
pub fn dashboard_href(route_key: &str, sort: TableSort, week: Option<&str>) -> String {
    let mut url = DASHBOARD_URL.clone();
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("route", route_key)
            .append_pair("sort", sort.key.as_str())
            .append_pair("dir", sort.direction.as_str());
        if let Some(week) = week {
            query.append_pair("week", week);
        }
    }

    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}
