use serde::Deserialize;
use std::net::SocketAddr;

/// 피드 URL을 덮어쓰는 환경 변수
pub const FEED_URL_ENV: &str = "FLIGHT_FEED_URL";

const DEFAULT_FEED_URL: &str =
    "https://raw.githubusercontent.com/jrkim3888/airplane_ticket_price_tracker/main/data.json";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub web: Web,
    #[serde(default)]
    pub feed: Feed,
    #[serde(default)]
    pub briefing: Briefing,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Web {
    pub host: SocketAddr,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feed {
    #[serde(default = "default_feed_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Feed {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// 브리핑 발송 시각 (KST, 0-23시)
#[derive(Debug, Clone, Deserialize)]
pub struct Briefing {
    #[serde(default = "default_briefing_hours")]
    pub hours: Vec<u32>,
}

impl Default for Briefing {
    fn default() -> Self {
        Self {
            hours: default_briefing_hours(),
        }
    }
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_briefing_hours() -> Vec<u32> {
    vec![9, 13, 17, 21]
}

impl Config {
    /// `FLIGHT_FEED_URL`이 설정되어 있으면 피드 URL을 교체
    pub fn apply_env(mut self) -> Self {
        if let Ok(url) = std::env::var(FEED_URL_ENV) {
            let url = url.trim();
            if !url.is_empty() {
                self.feed.url = url.to_string();
            }
        }
        self
    }
}
