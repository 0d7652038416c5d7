//! Smallcap Watcher 배치 수집기.
//!
//! 관심종목마다 스크래핑 서비스에서 지표를 가져와 현재 스냅샷(`watch_list`)과
//! 일별 이력(`watch_detail`)을 갱신합니다.

pub mod client;
pub mod config;
pub mod error;
pub mod modules;
pub mod retry;
pub mod stats;
pub mod storage;

pub use client::{FetchError, ScraperClient};
pub use config::{BatchConfig, ScraperConfig, WatcherConfig};
pub use error::{CollectorError, Result};
pub use retry::{RetryConfig, RetryStats};
pub use stats::BatchStats;
pub use storage::{MemoryWatchStore, PgWatchStore, StorageError, WatchStore};
