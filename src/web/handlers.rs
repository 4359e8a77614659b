use std::{convert::Infallible, sync::Arc};
use serde::Deserialize;
use warp::http::StatusCode;
use warp::Reply;

use crate::deriver::{SortDirection, SortKey, TableSort};
use crate::flight::FlightDataset;
use crate::template::dashboard::{DashboardParams, DashboardTemplate};
use super::State;

const FEED_FAILURE_MESSAGE: &str = "Failed to fetch flight data";

/// `/dashboard` 쿼리. 알 수 없는 값은 기본값으로 취급
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub route: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub week: Option<String>,
}

impl DashboardQuery {
    pub fn into_params(self) -> DashboardParams {
        let key = self
            .sort
            .as_deref()
            .and_then(SortKey::from_param)
            .unwrap_or_default();
        let direction = self
            .dir
            .as_deref()
            .and_then(SortDirection::from_param)
            .unwrap_or_default();

        DashboardParams {
            route: self.route,
            sort: TableSort::new(key, direction),
            week: self.week,
        }
    }
}

/// 데이터셋 조회. 실패하면 이번 요청은 502로 끝남 (재시도 없음)
pub async fn fetch_or_failure(state: &State) -> Result<FlightDataset, warp::reply::Response> {
    state.feed.fetch_dataset().await.map_err(|e| {
        tracing::error!("{}: {:#}", FEED_FAILURE_MESSAGE, e);
        warp::reply::with_status(FEED_FAILURE_MESSAGE, StatusCode::BAD_GATEWAY).into_response()
    })
}

pub async fn dashboard_handler(
    state: Arc<State>,
    query: DashboardQuery,
) -> std::result::Result<warp::reply::Response, Infallible> {
    let dataset = match fetch_or_failure(&state).await {
        Ok(dataset) => dataset,
        Err(failure) => return Ok(failure),
    };

    let params = query.into_params();
    let template = DashboardTemplate::build(&dataset, &params, state.today());

    Ok(template.into_response())
}
