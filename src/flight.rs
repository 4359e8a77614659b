use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

use crate::serde_lenient;

/// 3인 좌석이 없음을 뜻하는 피드상의 값
pub const PAX3_UNAVAILABLE: i64 = -1;

/// `data.json` 루트 문서
#[derive(Debug, Clone, Deserialize)]
pub struct FlightDataset {
    #[serde(default, deserialize_with = "serde_lenient::timestamp")]
    pub updated_at: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "serde_lenient::records")]
    pub routes: Vec<Route>,
}

/// 출발지-목적지 구간
#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    #[serde(default, deserialize_with = "serde_lenient::null_as_default")]
    pub origin: String,
    #[serde(default, deserialize_with = "serde_lenient::null_as_default")]
    pub destination: String,
    #[serde(default, deserialize_with = "serde_lenient::null_as_default")]
    pub label: String,
    #[serde(default, deserialize_with = "serde_lenient::records")]
    pub weeks: Vec<WeekEntry>,
    #[serde(default, deserialize_with = "serde_lenient::records")]
    pub overall_history: Vec<HistoryEntry>,
    /// key: 출발일 (YYYY-MM-DD). BTreeMap이라 키가 날짜순으로 정렬됨
    #[serde(default, deserialize_with = "serde_lenient::keyed_records")]
    pub weekly_history: BTreeMap<String, Vec<HistoryEntry>>,
}

impl Route {
    /// URL 등에서 구간을 식별하는 키 (예: "ICN-FUK")
    pub fn key(&self) -> String {
        format!("{}-{}", self.origin, self.destination)
    }
}

/// 출발일/귀국일 조합 하나와 그 가격 스냅샷
#[derive(Debug, Clone, Deserialize)]
pub struct WeekEntry {
    pub depart_date: NaiveDate,
    pub return_date: NaiveDate,
    /// 0 이하이면 가격 없음
    #[serde(default, deserialize_with = "serde_lenient::null_as_default")]
    pub min_price: i64,
    #[serde(default, deserialize_with = "serde_lenient::null_as_default")]
    pub airline: String,
    /// "가는편 / 오는편"
    #[serde(default, deserialize_with = "serde_lenient::null_as_default")]
    pub flight_info: String,
    /// 대한항공 가격 (None이면 미확인)
    #[serde(default)]
    pub kal_price: Option<i64>,
    #[serde(default)]
    pub kal_flight_info: Option<String>,
    #[serde(default)]
    pub pax3_price: Pax3Price,
    #[serde(default, deserialize_with = "serde_lenient::timestamp")]
    pub updated_at: Option<DateTime<FixedOffset>>,
}

impl WeekEntry {
    /// 실제 판매 가격이 있는지
    pub fn has_offer(&self) -> bool {
        self.min_price > 0
    }

    /// 기준일 당일 또는 이후 출발인지
    pub fn departs_on_or_after(&self, as_of: NaiveDate) -> bool {
        self.depart_date >= as_of
    }
}

/// 특정 시점의 가격 관측값
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntry {
    #[serde(default, deserialize_with = "serde_lenient::timestamp")]
    pub snapshot_at: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "serde_lenient::null_as_default")]
    pub price: i64,
    #[serde(default, deserialize_with = "serde_lenient::null_as_default")]
    pub airline: String,
    #[serde(default)]
    pub depart_date: Option<NaiveDate>,
}

/// 3인 동시 예약 시 1인 가격
///
/// 피드에서는 `null`(미확인)과 `-1`(1인 가격은 있으나 3석 없음)을 구분합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pax3Price {
    #[default]
    Unknown,
    Unavailable,
    Known(i64),
}

impl From<Option<i64>> for Pax3Price {
    fn from(value: Option<i64>) -> Self {
        match value {
            None => Pax3Price::Unknown,
            Some(PAX3_UNAVAILABLE) => Pax3Price::Unavailable,
            Some(amount) if amount >= 0 => Pax3Price::Known(amount),
            // 정의되지 않은 음수
            Some(_) => Pax3Price::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for Pax3Price {
    fn deserialize<D>(de: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<i64>::deserialize(de).map(Pax3Price::from)
    }
}
