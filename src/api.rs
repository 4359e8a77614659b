use crate::briefing::build_briefing;
use crate::deriver::{
    classify_pax3_price, compute_nights, derive_route, overall_series, parse_flight_segments,
    select_weekly_key, visible_routes, weekly_history_keys, weekly_series, ChartPoint,
    DerivedRoute, FlightSegments, Pax3Class, TableSort,
};
use crate::flight::{Route, WeekEntry};
use crate::format::naver_link;
use crate::web::handlers::{fetch_or_failure, DashboardQuery};
use crate::web::State;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use warp::filters::BoxedFilter;
use warp::http::StatusCode;
use warp::{Filter, Reply};

pub fn api(state: Arc<State>) -> BoxedFilter<(impl Reply,)> {
    warp::path("api")
        .and(
            routes(state.clone())
                .or(history(state.clone()))
                .or(briefing(state)),
        )
        .boxed()
}

fn routes(state: Arc<State>) -> BoxedFilter<(impl Reply,)> {
    async fn logic(state: Arc<State>, query: DashboardQuery) -> Result<warp::reply::Response, Infallible> {
        let dataset = match fetch_or_failure(&state).await {
            Ok(dataset) => dataset,
            Err(failure) => return Ok(failure),
        };

        let as_of = state.today();
        let sort = query.into_params().sort;
        let routes: Vec<ApiRouteSummary> = visible_routes(&dataset)
            .map(|route| ApiRouteSummary::from(derive_route(route, as_of, sort)))
            .collect();

        Ok(warp::reply::json(&ApiDashboard {
            updated_at: dataset.updated_at,
            as_of,
            sort,
            routes,
        })
        .into_response())
    }

    let route = warp::path("routes")
        .and(warp::path::end())
        .and(warp::query::<DashboardQuery>())
        .and_then(move |query: DashboardQuery| logic(Arc::clone(&state), query));
    warp::get().and(route).boxed()
}

#[derive(Debug, Default, Deserialize)]
struct HistoryQuery {
    week: Option<String>,
}

fn history(state: Arc<State>) -> BoxedFilter<(impl Reply,)> {
    async fn logic(
        state: Arc<State>,
        route_key: String,
        query: HistoryQuery,
    ) -> Result<warp::reply::Response, Infallible> {
        let dataset = match fetch_or_failure(&state).await {
            Ok(dataset) => dataset,
            Err(failure) => return Ok(failure),
        };

        let route = match dataset.routes.iter().find(|route| route.key() == route_key) {
            Some(route) => route,
            None => {
                return Ok(warp::reply::with_status(
                    warp::reply::json(&"unknown route"),
                    StatusCode::NOT_FOUND,
                )
                .into_response())
            }
        };

        Ok(warp::reply::json(&ApiHistory::build(route, query.week.as_deref())).into_response())
    }

    let route = warp::path("routes")
        .and(warp::path::param::<String>())
        .and(warp::path("history"))
        .and(warp::path::end())
        .and(warp::query::<HistoryQuery>())
        .and_then(move |route_key: String, query: HistoryQuery| logic(Arc::clone(&state), route_key, query));
    warp::get().and(route).boxed()
}

fn briefing(state: Arc<State>) -> BoxedFilter<(impl Reply,)> {
    async fn logic(state: Arc<State>) -> Result<warp::reply::Response, Infallible> {
        let dataset = match fetch_or_failure(&state).await {
            Ok(dataset) => dataset,
            Err(failure) => return Ok(failure),
        };

        let message = build_briefing(&dataset, state.now(), &state.config.briefing.hours);
        Ok(warp::reply::with_header(
            message,
            "content-type",
            mime::TEXT_PLAIN_UTF_8.as_ref(),
        )
        .into_response())
    }

    let route = warp::path("briefing")
        .and(warp::path::end())
        .and_then(move || logic(Arc::clone(&state)));
    warp::get().and(route).boxed()
}

#[derive(Debug, Serialize)]
pub struct ApiDashboard {
    pub updated_at: Option<DateTime<FixedOffset>>,
    pub as_of: NaiveDate,
    pub sort: TableSort,
    pub routes: Vec<ApiRouteSummary>,
}

#[derive(Debug, Serialize)]
pub struct ApiRouteSummary {
    pub key: String,
    pub origin: String,
    pub destination: String,
    pub label: String,
    pub best: Option<ApiWeek>,
    pub sibling: Option<ApiWeek>,
    pub best_named_carrier: Option<ApiWeek>,
    pub lowest_price: Option<i64>,
    pub weeks: Vec<ApiWeek>,
    pub weekly_history_keys: Vec<String>,
}

impl From<DerivedRoute<'_>> for ApiRouteSummary {
    fn from(derived: DerivedRoute<'_>) -> Self {
        let route = derived.route;
        let to_api = |week: &WeekEntry| ApiWeek::new(route, week);

        Self {
            key: route.key(),
            origin: route.origin.clone(),
            destination: route.destination.clone(),
            label: route.label.clone(),
            best: derived.best.map(to_api),
            sibling: derived.sibling.map(to_api),
            best_named_carrier: derived.best_named_carrier.map(to_api),
            lowest_price: derived.lowest_price,
            weeks: derived.table.iter().map(|week| to_api(*week)).collect(),
            weekly_history_keys: weekly_history_keys(route)
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiWeek {
    pub depart_date: NaiveDate,
    pub return_date: NaiveDate,
    pub nights: i64,
    pub min_price: Option<i64>,
    pub airline: String,
    pub flight: FlightSegments,
    pub kal_price: Option<i64>,
    pub kal_flight: Option<FlightSegments>,
    pub pax3: Pax3Class,
    pub naver_link: String,
    pub updated_at: Option<DateTime<FixedOffset>>,
}

impl ApiWeek {
    fn new(route: &Route, week: &WeekEntry) -> Self {
        Self {
            depart_date: week.depart_date,
            return_date: week.return_date,
            nights: compute_nights(week.depart_date, week.return_date),
            min_price: week.has_offer().then_some(week.min_price),
            airline: week.airline.clone(),
            flight: parse_flight_segments(&week.flight_info),
            kal_price: week.kal_price,
            kal_flight: week.kal_flight_info.as_deref().map(parse_flight_segments),
            pax3: classify_pax3_price(week.min_price, week.pax3_price),
            naver_link: naver_link(&route.origin, &route.destination, week.depart_date, week.return_date),
            updated_at: week.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiHistory {
    pub overall: Vec<ChartPoint>,
    pub week: Option<String>,
    pub weekly: Vec<ChartPoint>,
}

impl ApiHistory {
    fn build(route: &Route, requested_week: Option<&str>) -> Self {
        let week = select_weekly_key(route, requested_week);
        Self {
            overall: overall_series(route),
            week: week.map(str::to_string),
            weekly: week.map(|key| weekly_series(route, key)).unwrap_or_default(),
        }
    }
}
