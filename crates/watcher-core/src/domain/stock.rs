//! 관심종목 및 종목 지표 타입.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::signal::{PriceSignal, Signal};
use crate::normalize::{normalize, normalize_previous_close};

/// 관심종목 목록의 한 항목.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchEntry {
    /// 종목 코드 (예: "7203")
    pub ticker: String,
    /// 종목명 (TSV 두 번째 컬럼, 없으면 빈 문자열)
    pub company_name: String,
}

impl WatchEntry {
    /// 새 항목 생성
    pub fn new(ticker: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            company_name: company_name.into(),
        }
    }
}

/// 스크래핑 서비스 응답.
///
/// 모든 값은 로케일 서식이 적용된 표시 문자열입니다 (예: `"2,493.0円"`, `"13.5倍"`).
/// 누락되거나 `null`인 필드는 빈 문자열로 역직렬화되고, 정규화 단계에서 "없음"으로 처리됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StockSnapshot {
    #[serde(deserialize_with = "null_as_empty")]
    pub ticker: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub company_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub current_price: String,
    /// 예: `"2,496.5 (12/29)"`
    #[serde(deserialize_with = "null_as_empty")]
    pub previous_close: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub dividend_yield: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub per: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub pbr: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub market_cap: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub volume: String,
}

/// `null`을 빈 문자열로 역직렬화
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// 정규화된 숫자 지표.
///
/// 각 필드는 파싱에 성공한 값이거나 `None`입니다. 파싱 실패를 0으로 대체하지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedMetrics {
    pub current_price: Option<Decimal>,
    pub pbr: Option<Decimal>,
    pub volume: Option<Decimal>,
    pub previous_close: Option<Decimal>,
}

impl NormalizedMetrics {
    /// 스냅샷의 표시 문자열을 정규화
    pub fn from_snapshot(snapshot: &StockSnapshot) -> Self {
        Self {
            current_price: normalize(&snapshot.current_price),
            pbr: normalize(&snapshot.pbr),
            volume: normalize(&snapshot.volume),
            previous_close: normalize_previous_close(&snapshot.previous_close),
        }
    }

    /// 거래량 정수 값 (소수점 이하 버림).
    ///
    /// i64 범위를 벗어나면 `None`.
    pub fn volume_shares(&self) -> Option<i64> {
        self.volume.and_then(|v| v.trunc().to_i64())
    }
}

/// `watch_list` 테이블의 현재 스냅샷 레코드.
///
/// 배치 실행마다 ticker 기준으로 전체 필드가 덮어써집니다.
/// 표시용 문자열(전일 종가, 배당수익률, PER, 시가총액)은 원문 그대로 보관합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentRecord {
    pub ticker: String,
    pub company_name: String,
    pub current_price: Option<Decimal>,
    pub previous_close: String,
    pub dividend_yield: String,
    pub per: String,
    pub pbr: Option<Decimal>,
    pub market_cap: String,
    pub volume: Option<i64>,
    pub price_movement: String,
    pub signal: Signal,
}

impl CurrentRecord {
    /// 스냅샷, 정규화 결과, 신호로 레코드 구성.
    ///
    /// 키는 관심종목 목록의 `ticker`를 사용합니다 (응답 본문의 ticker가 아님).
    pub fn build(
        ticker: &str,
        snapshot: &StockSnapshot,
        metrics: &NormalizedMetrics,
        price_signal: PriceSignal,
    ) -> Self {
        Self {
            ticker: ticker.to_string(),
            company_name: snapshot.company_name.clone(),
            current_price: metrics.current_price,
            previous_close: snapshot.previous_close.clone(),
            dividend_yield: snapshot.dividend_yield.clone(),
            per: snapshot.per.clone(),
            pbr: metrics.pbr,
            market_cap: snapshot.market_cap.clone(),
            volume: metrics.volume_shares(),
            price_movement: price_signal.movement,
            signal: price_signal.signal,
        }
    }
}

/// `watch_detail` 테이블의 일별 이력 레코드.
///
/// (ticker, yymmdd) 기준으로 하루 한 건이며, 같은 날 재실행하면 덮어씁니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// 날짜 키 (YYMMDD)
    pub yymmdd: String,
    #[serde(flatten)]
    pub record: CurrentRecord,
}

impl HistoryRecord {
    /// 현재 레코드에 날짜 키를 붙여 이력 레코드 생성
    pub fn new(record: CurrentRecord, date: NaiveDate) -> Self {
        Self {
            yymmdd: Self::date_key(date),
            record,
        }
    }

    /// `YYMMDD` 형식 날짜 키
    pub fn date_key(date: NaiveDate) -> String {
        date.format("%y%m%d").to_string()
    }

    pub fn ticker(&self) -> &str {
        &self.record.ticker
    }
}
