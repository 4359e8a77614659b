//! 가격 피드 HTTP 클라이언트
//!
//! 외부 수집기가 만든 `data.json`을 요청마다 한 번 가져옵니다.
//! 캐시와 재시도는 하지 않습니다. 실패하면 해당 요청 전체가 실패합니다.

use std::time::Duration;

use anyhow::Context;

use crate::config::Feed as FeedConfig;
use crate::flight::FlightDataset;

const USER_AGENT: &str = concat!("flight-dashboard/", env!("CARGO_PKG_VERSION"));

/// 가격 피드 클라이언트
pub struct FeedClient {
    url: String,
    http: reqwest::Client,
}

impl FeedClient {
    /// 새 피드 클라이언트 생성
    pub fn new(config: &FeedConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("could not build http client")?;

        Ok(Self {
            url: config.url.clone(),
            http,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// 데이터셋 전체 조회
    pub async fn fetch_dataset(&self) -> anyhow::Result<FlightDataset> {
        let response = self
            .http
            .get(&self.url)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await
            .context("could not reach flight data feed")?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Failed to fetch flight data: {}", status);
        }

        let dataset: FlightDataset = response
            .json()
            .await
            .context("could not decode flight data feed")?;

        tracing::debug!(
            "Fetched {} routes (updated_at: {:?})",
            dataset.routes.len(),
            dataset.updated_at
        );

        Ok(dataset)
    }
}
