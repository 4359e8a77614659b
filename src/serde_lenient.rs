//! 피드 역직렬화 헬퍼
//!
//! 개별 필드/레코드가 비어 있거나 깨져 있어도 문서 전체를 실패시키지 않습니다.

use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// `null`을 기본값으로 취급
pub fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// 타임스탬프 문자열. 해석 불가능하면 `None`
pub fn timestamp<'de, D>(de: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Deserialize::deserialize(de)?;
    Ok(raw.as_deref().and_then(crate::kst::parse_timestamp))
}

/// 레코드 배열. 디코딩에 실패한 레코드만 건너뜀
pub fn records<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw: Option<Vec<Value>> = Deserialize::deserialize(de)?;
    Ok(decode_each(raw.unwrap_or_default()))
}

/// 키별 레코드 배열 (주별 히스토리)
pub fn keyed_records<'de, D, T>(de: D) -> Result<BTreeMap<String, Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw: Option<BTreeMap<String, Option<Vec<Value>>>> = Deserialize::deserialize(de)?;
    let map = raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, values)| (key, decode_each(values.unwrap_or_default())))
        .collect();
    Ok(map)
}

fn decode_each<T: DeserializeOwned>(values: Vec<Value>) -> Vec<T> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<T>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("skipping undecodable record: {}", e);
                None
            }
        })
        .collect()
}
