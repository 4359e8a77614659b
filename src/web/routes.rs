use std::sync::Arc;
use warp::{filters::BoxedFilter, http::Uri, Filter, Reply};

use super::handlers::{self, DashboardQuery};
use super::State;

pub fn router(state: Arc<State>) -> BoxedFilter<(impl Reply,)> {
    index()
        .or(dashboard(Arc::clone(&state)))
        .or(assets())
        .or(crate::api::api(Arc::clone(&state)))
        .boxed()
}

fn index() -> BoxedFilter<(impl Reply,)> {
    let route = warp::path::end().map(|| warp::redirect(Uri::from_static("/dashboard")));
    warp::get().and(route).boxed()
}

fn dashboard(state: Arc<State>) -> BoxedFilter<(impl Reply,)> {
    let route = warp::path("dashboard")
        .and(warp::path::end())
        .and(warp::query::<DashboardQuery>())
        .and_then(move |query: DashboardQuery| handlers::dashboard_handler(Arc::clone(&state), query));

    warp::get().and(route).boxed()
}

fn assets() -> BoxedFilter<(impl Reply,)> {
    warp::get()
        .and(warp::path("assets"))
        .and(dashboard_css())
        .boxed()
}

fn dashboard_css() -> BoxedFilter<(impl Reply,)> {
    warp::path("dashboard.css")
        .and(warp::path::end())
        .and(warp::fs::file("./assets/dashboard.css"))
        .boxed()
}
