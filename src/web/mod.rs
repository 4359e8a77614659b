use std::sync::Arc;
use anyhow::Result;
use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::config::Config;
use crate::feed::FeedClient;

pub mod routes;
pub mod handlers;

pub async fn start(config: Arc<Config>) -> Result<()> {
    let state = State::new(Arc::clone(&config))?;

    tracing::info!("flight data feed: {}", state.feed.url());
    tracing::info!("listening at {}", config.web.host);
    warp::serve(routes::router(state)).run(config.web.host).await;
    Ok(())
}

/// 요청 간 공유 상태. 데이터셋은 요청마다 새로 가져오므로 여기에 두지 않음
pub struct State {
    pub config: Arc<Config>,
    pub feed: FeedClient,
    /// 현재 시각 (KST). "오늘" 판정의 기준
    pub clock: fn() -> DateTime<FixedOffset>,
}

impl State {
    pub fn new(config: Arc<Config>) -> Result<Arc<Self>> {
        Self::with_clock(config, crate::kst::now)
    }

    pub fn with_clock(config: Arc<Config>, clock: fn() -> DateTime<FixedOffset>) -> Result<Arc<Self>> {
        let feed = FeedClient::new(&config.feed)?;

        Ok(Arc::new(Self { config, feed, clock }))
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        (self.clock)()
    }

    /// 오늘 날짜 (KST)
    pub fn today(&self) -> NaiveDate {
        crate::kst::date_at(&self.now())
    }
}
