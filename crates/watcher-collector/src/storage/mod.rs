//! 관심종목 / 스냅샷 / 일별 이력 저장소.
//!
//! 배치는 [`WatchStore`] 트레이트만 사용합니다.
//! - [`PgWatchStore`] - PostgreSQL (`watch_list`, `watch_detail` 테이블)
//! - [`MemoryWatchStore`] - 프로세스 내 저장소 (테스트, 드라이런)

mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use watcher_core::{CurrentRecord, HistoryRecord, WatchEntry};

pub use memory::MemoryWatchStore;
pub use postgres::PgWatchStore;

/// 저장소 에러
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("데이터베이스 에러: {0}")]
    Database(#[from] sqlx::Error),

    #[error("저장소 사용 불가: {0}")]
    Unavailable(String),
}

/// 배치가 사용하는 저장소 인터페이스.
#[async_trait]
pub trait WatchStore: Send + Sync {
    /// 관심종목 ticker 전체 조회 (중복 없음)
    async fn list_watched_tickers(&self) -> Result<Vec<String>, StorageError>;

    /// 관심종목 등록 (ticker 기준 UPSERT, 종목명만 갱신)
    async fn upsert_watch_entry(&self, entry: &WatchEntry) -> Result<(), StorageError>;

    /// 현재 스냅샷 저장 (ticker 기준 전체 필드 UPSERT)
    async fn upsert_snapshot(&self, record: &CurrentRecord) -> Result<(), StorageError>;

    /// 일별 이력 저장 ((ticker, yymmdd) 기준 전체 교체)
    async fn replace_history(&self, record: &HistoryRecord) -> Result<(), StorageError>;

    /// 스냅샷과 이력을 함께 저장.
    ///
    /// 기본 구현은 두 번의 독립된 쓰기입니다. 사이에서 실패하면 스냅샷만 갱신된 상태가
    /// 남을 수 있으며, 다음 배치 실행에서 다시 쓰여집니다.
    async fn persist(
        &self,
        current: &CurrentRecord,
        history: &HistoryRecord,
    ) -> Result<(), StorageError> {
        self.upsert_snapshot(current).await?;
        self.replace_history(history).await
    }
}
