//! 관심종목 TSV 등록 통합 테스트

use std::io::Write;

use tempfile::NamedTempFile;
use watcher_collector::modules::seed_watch_list;
use watcher_collector::{CollectorError, MemoryWatchStore, WatchStore};
use watcher_core::WatchEntry;

fn tsv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn test_seed_registers_entries() {
    let file = tsv("ticker\tcompanyName\n8306\t三菱UFJ\n\n7203\tトヨタ自動車\n");
    let store = MemoryWatchStore::new();

    let count = seed_watch_list(&store, file.path()).await.unwrap();

    assert_eq!(count, 2);
    assert_eq!(
        store.list_watched_tickers().await.unwrap(),
        vec!["7203".to_string(), "8306".to_string()]
    );
}

#[tokio::test]
async fn test_reseed_updates_company_name_only() {
    let store = MemoryWatchStore::new();
    seed_watch_list(&store, tsv("8306\t三菱UFJ\n").path())
        .await
        .unwrap();
    seed_watch_list(&store, tsv("8306\t三菱UFJフィナンシャル・グループ\n").path())
        .await
        .unwrap();

    assert_eq!(
        store.entries(),
        vec![WatchEntry::new("8306", "三菱UFJフィナンシャル・グループ")]
    );
}

#[tokio::test]
async fn test_empty_ticker_aborts_without_writes() {
    let file = tsv("8306\t三菱UFJ\n\t名無し\n7203\tトヨタ自動車\n");
    let store = MemoryWatchStore::new();

    let err = seed_watch_list(&store, file.path()).await.unwrap_err();

    assert!(matches!(err, CollectorError::Input { line: 2, .. }));
    assert!(store.entries().is_empty());
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryWatchStore::new();

    let err = seed_watch_list(&store, &dir.path().join("missing.tsv"))
        .await
        .unwrap_err();

    assert!(matches!(err, CollectorError::Io(_)));
}
