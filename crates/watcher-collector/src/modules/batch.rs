//! 관심종목 배치 수집 모듈.
//!
//! 종목마다 조회 → 정규화 → 신호 산출 → 스냅샷/이력 저장을 순서대로 수행합니다.
//! 한 종목의 실패는 기록만 하고 다음 종목으로 넘어갑니다.

use std::time::Instant;

use chrono::{Local, NaiveDate};
use watcher_core::{compute_signal, CurrentRecord, HistoryRecord, NormalizedMetrics, StockSnapshot};

use crate::client::ScraperClient;
use crate::config::BatchConfig;
use crate::stats::BatchStats;
use crate::storage::{StorageError, WatchStore};
use crate::Result;

/// 배치 실행. 이력 날짜 키는 종목마다 저장 시점의 로컬 날짜를 사용합니다.
pub async fn run_batch(
    store: &dyn WatchStore,
    client: &ScraperClient,
    config: &BatchConfig,
) -> Result<BatchStats> {
    run_batch_with(store, client, config, || Local::now().date_naive()).await
}

/// 모든 종목을 지정한 날짜 키로 저장하는 배치 실행.
pub async fn run_batch_on(
    store: &dyn WatchStore,
    client: &ScraperClient,
    config: &BatchConfig,
    date: NaiveDate,
) -> Result<BatchStats> {
    run_batch_with(store, client, config, move || date).await
}

/// 날짜 공급 함수를 받는 배치 실행.
///
/// `today`는 종목을 저장할 때마다 호출되므로, 자정을 넘긴 실행에서는 이후 종목이
/// 다음 날짜 키로 저장됩니다. 관심종목 조회 실패만 에러로 반환합니다.
pub async fn run_batch_with<F>(
    store: &dyn WatchStore,
    client: &ScraperClient,
    config: &BatchConfig,
    today: F,
) -> Result<BatchStats>
where
    F: Fn() -> NaiveDate,
{
    let start = Instant::now();
    let mut stats = BatchStats::new();

    let tickers = store.list_watched_tickers().await?;
    stats.total = tickers.len();

    if tickers.is_empty() {
        tracing::warn!("관심종목이 없습니다");
        stats.elapsed = start.elapsed();
        return Ok(stats);
    }

    tracing::info!(
        count = tickers.len(),
        base_url = client.base_url(),
        "배치 시작"
    );

    for (idx, ticker) in tickers.iter().enumerate() {
        match client.fetch(ticker).await {
            Ok(snapshot) => match update_stock(store, ticker, &snapshot, today()).await {
                Ok(record) => {
                    stats.success += 1;
                    stats.record_signal(record.signal);
                    tracing::debug!(
                        ticker = %ticker,
                        movement = %record.price_movement,
                        signal = %record.signal,
                        "저장 완료"
                    );
                }
                Err(e) => {
                    stats.write_failed += 1;
                    tracing::error!(ticker = %ticker, error = %e, "저장 실패");
                }
            },
            Err(e) => {
                stats.fetch_failed += 1;
                tracing::error!(ticker = %ticker, status = ?e.status(), error = %e, "조회 실패");
            }
        }

        // 마지막 종목 뒤에는 대기하지 않음
        if idx + 1 < tickers.len() && !config.request_interval.is_zero() {
            tokio::time::sleep(config.request_interval).await;
        }
    }

    stats.elapsed = start.elapsed();
    Ok(stats)
}

/// 조회 결과 하나를 정규화해 스냅샷과 이력으로 저장.
///
/// 저장된 스냅샷 레코드를 반환합니다.
pub async fn update_stock(
    store: &dyn WatchStore,
    ticker: &str,
    snapshot: &StockSnapshot,
    date: NaiveDate,
) -> std::result::Result<CurrentRecord, StorageError> {
    let metrics = NormalizedMetrics::from_snapshot(snapshot);
    let price_signal = compute_signal(metrics.current_price, metrics.previous_close);

    if metrics.current_price.is_none() {
        tracing::debug!(ticker = %ticker, raw = %snapshot.current_price, "현재가 해석 불가");
    }

    let current = CurrentRecord::build(ticker, snapshot, &metrics, price_signal);
    let history = HistoryRecord::new(current.clone(), date);

    store.persist(&current, &history).await?;
    Ok(current)
}
