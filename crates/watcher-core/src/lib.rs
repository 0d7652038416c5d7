//! Smallcap Watcher 핵심 도메인.
//!
//! 스크래핑 서비스가 돌려주는 일본어 로케일 문자열을 숫자로 정규화하고,
//! 전일 종가 대비 등락률로 매매 신호를 산출합니다.
//!
//! - [`domain`] - 관심종목, 스냅샷, 저장 레코드 타입
//! - [`normalize`] - `1.5億円`, `12,345`, `－` 같은 표시 문자열 정규화
//! - [`signal_engine`] - 등락률 계산 및 Buy/Sell/Neutral 분류

pub mod domain;
pub mod normalize;
pub mod signal_engine;

pub use domain::{
    CurrentRecord, HistoryRecord, NormalizedMetrics, PriceSignal, Signal, StockSnapshot,
    WatchEntry,
};
pub use normalize::{normalize, normalize_previous_close};
pub use signal_engine::{classify, compute_signal, SIGNAL_THRESHOLD_PCT};
