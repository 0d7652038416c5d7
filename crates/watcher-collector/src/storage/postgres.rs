//! PostgreSQL 저장소.
//!
//! 테이블 스키마는 이 크레이트가 관리하지 않습니다. 기대하는 형태:
//!
//! ```text
//! watch_list   (ticker PK, company_name, current_price NUMERIC, previous_close,
//!               dividend_yield, per, pbr NUMERIC, market_cap, volume BIGINT,
//!               price_movement, signal_val, memo)
//! watch_detail (ticker, yymmdd CHAR(6), ...watch_list 컬럼..., PK (ticker, yymmdd))
//! ```

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use watcher_core::{CurrentRecord, HistoryRecord, WatchEntry};

use super::{StorageError, WatchStore};

/// PostgreSQL 기반 [`WatchStore`].
#[derive(Debug, Clone)]
pub struct PgWatchStore {
    pool: PgPool,
}

impl PgWatchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

async fn upsert_snapshot_with(
    conn: &mut PgConnection,
    record: &CurrentRecord,
) -> Result<(), StorageError> {
    sqlx::query(
        r#"
        INSERT INTO watch_list (
            ticker, company_name, current_price, previous_close, dividend_yield,
            per, pbr, market_cap, volume, price_movement, signal_val
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (ticker)
        DO UPDATE SET
            company_name = EXCLUDED.company_name,
            current_price = EXCLUDED.current_price,
            previous_close = EXCLUDED.previous_close,
            dividend_yield = EXCLUDED.dividend_yield,
            per = EXCLUDED.per,
            pbr = EXCLUDED.pbr,
            market_cap = EXCLUDED.market_cap,
            volume = EXCLUDED.volume,
            price_movement = EXCLUDED.price_movement,
            signal_val = EXCLUDED.signal_val
        "#,
    )
    .bind(&record.ticker)
    .bind(&record.company_name)
    .bind(record.current_price)
    .bind(&record.previous_close)
    .bind(&record.dividend_yield)
    .bind(&record.per)
    .bind(record.pbr)
    .bind(&record.market_cap)
    .bind(record.volume)
    .bind(&record.price_movement)
    .bind(record.signal.as_str())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn replace_history_with(
    conn: &mut PgConnection,
    history: &HistoryRecord,
) -> Result<(), StorageError> {
    let record = &history.record;

    // REPLACE 의미: 같은 날 재실행 시 해당 일자 행 전체를 덮어씀 (memo 포함)
    sqlx::query(
        r#"
        INSERT INTO watch_detail (
            ticker, yymmdd, company_name, current_price, previous_close, dividend_yield,
            per, pbr, market_cap, volume, price_movement, signal_val, memo
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, NULL)
        ON CONFLICT (ticker, yymmdd)
        DO UPDATE SET
            company_name = EXCLUDED.company_name,
            current_price = EXCLUDED.current_price,
            previous_close = EXCLUDED.previous_close,
            dividend_yield = EXCLUDED.dividend_yield,
            per = EXCLUDED.per,
            pbr = EXCLUDED.pbr,
            market_cap = EXCLUDED.market_cap,
            volume = EXCLUDED.volume,
            price_movement = EXCLUDED.price_movement,
            signal_val = EXCLUDED.signal_val,
            memo = EXCLUDED.memo
        "#,
    )
    .bind(&record.ticker)
    .bind(&history.yymmdd)
    .bind(&record.company_name)
    .bind(record.current_price)
    .bind(&record.previous_close)
    .bind(&record.dividend_yield)
    .bind(&record.per)
    .bind(record.pbr)
    .bind(&record.market_cap)
    .bind(record.volume)
    .bind(&record.price_movement)
    .bind(record.signal.as_str())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

#[async_trait]
impl WatchStore for PgWatchStore {
    async fn list_watched_tickers(&self) -> Result<Vec<String>, StorageError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT ticker FROM watch_list ORDER BY ticker")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|(ticker,)| ticker).collect())
    }

    async fn upsert_watch_entry(&self, entry: &WatchEntry) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO watch_list (ticker, company_name)
            VALUES ($1, $2)
            ON CONFLICT (ticker)
            DO UPDATE SET company_name = EXCLUDED.company_name
            "#,
        )
        .bind(&entry.ticker)
        .bind(&entry.company_name)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn upsert_snapshot(&self, record: &CurrentRecord) -> Result<(), StorageError> {
        let mut conn = self.pool.acquire().await?;
        upsert_snapshot_with(&mut conn, record).await
    }

    async fn replace_history(&self, record: &HistoryRecord) -> Result<(), StorageError> {
        let mut conn = self.pool.acquire().await?;
        replace_history_with(&mut conn, record).await
    }

    /// 두 테이블 쓰기를 하나의 트랜잭션으로 묶음
    async fn persist(
        &self,
        current: &CurrentRecord,
        history: &HistoryRecord,
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;
        upsert_snapshot_with(&mut *tx, current).await?;
        replace_history_with(&mut *tx, history).await?;
        tx.commit().await?;
        Ok(())
    }
}
