//! 프로세스 내 저장소.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use watcher_core::{CurrentRecord, HistoryRecord, WatchEntry};

use super::{StorageError, WatchStore};

#[derive(Debug, Default)]
struct MemoryState {
    /// ticker → (종목명, 최신 스냅샷)
    watch_list: BTreeMap<String, (String, Option<CurrentRecord>)>,
    /// (ticker, yymmdd) → 이력
    history: BTreeMap<(String, String), HistoryRecord>,
}

/// 메모리 기반 [`WatchStore`].
///
/// `watch_list` / `watch_detail` 테이블과 같은 키 규칙을 따릅니다.
#[derive(Debug, Default)]
pub struct MemoryWatchStore {
    state: Mutex<MemoryState>,
}

impl MemoryWatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 종목명 없이 ticker만 등록된 저장소
    pub fn with_tickers<I, S>(tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        if let Ok(mut state) = store.state.lock() {
            for ticker in tickers {
                state
                    .watch_list
                    .insert(ticker.into(), (String::new(), None));
            }
        }
        store
    }

    /// 최신 스냅샷
    pub fn snapshot(&self, ticker: &str) -> Option<CurrentRecord> {
        self.lock()
            .ok()?
            .watch_list
            .get(ticker)
            .and_then(|(_, snapshot)| snapshot.clone())
    }

    /// 종목의 이력 (날짜 오름차순)
    pub fn history(&self, ticker: &str) -> Vec<HistoryRecord> {
        match self.lock() {
            Ok(state) => state
                .history
                .values()
                .filter(|h| h.ticker() == ticker)
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// 전체 이력 행 수
    pub fn history_len(&self) -> usize {
        self.lock().map(|s| s.history.len()).unwrap_or(0)
    }

    /// 스냅샷이 저장된 종목 수
    pub fn snapshot_count(&self) -> usize {
        self.lock()
            .map(|s| s.watch_list.values().filter(|(_, snap)| snap.is_some()).count())
            .unwrap_or(0)
    }

    /// 등록된 관심종목 (ticker 오름차순)
    pub fn entries(&self) -> Vec<WatchEntry> {
        match self.lock() {
            Ok(state) => state
                .watch_list
                .iter()
                .map(|(ticker, (name, _))| WatchEntry::new(ticker.clone(), name.clone()))
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|_| StorageError::Unavailable("메모리 저장소 잠금 오염".to_string()))
    }
}

#[async_trait]
impl WatchStore for MemoryWatchStore {
    async fn list_watched_tickers(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.lock()?.watch_list.keys().cloned().collect())
    }

    async fn upsert_watch_entry(&self, entry: &WatchEntry) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        state
            .watch_list
            .entry(entry.ticker.clone())
            .and_modify(|(name, _)| *name = entry.company_name.clone())
            .or_insert_with(|| (entry.company_name.clone(), None));
        Ok(())
    }

    async fn upsert_snapshot(&self, record: &CurrentRecord) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        state.watch_list.insert(
            record.ticker.clone(),
            (record.company_name.clone(), Some(record.clone())),
        );
        Ok(())
    }

    async fn replace_history(&self, record: &HistoryRecord) -> Result<(), StorageError> {
        let mut state = self.lock()?;
        state.history.insert(
            (record.ticker().to_string(), record.yymmdd.clone()),
            record.clone(),
        );
        Ok(())
    }
}
