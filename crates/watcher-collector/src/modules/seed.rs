//! 관심종목 TSV 등록 모듈.
//!
//! 형식: `ticker<TAB>companyName`, 첫 줄이 `ticker`로 시작하면 헤더로 보고 건너뜁니다.

use std::io::BufRead;
use std::path::Path;

use watcher_core::WatchEntry;

use crate::error::CollectorError;
use crate::storage::WatchStore;
use crate::Result;

/// TSV 파싱.
///
/// 빈 줄은 건너뛰며 줄 번호에도 포함하지 않습니다. ticker가 비어 있으면 해당 줄 번호로 에러.
pub fn parse_watch_list<R: BufRead>(reader: R) -> Result<Vec<WatchEntry>> {
    let mut entries = Vec::new();
    let mut line_no = 0usize;

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        line_no += 1;
        if line_no == 1 && line.trim().to_lowercase().starts_with("ticker") {
            continue;
        }

        let mut columns = line.split('\t');
        let ticker = columns.next().unwrap_or_default().trim();
        let company_name = columns.next().unwrap_or_default().trim();

        if ticker.is_empty() {
            return Err(CollectorError::Input {
                line: line_no,
                reason: "ticker가 비어 있습니다".to_string(),
            });
        }

        entries.push(WatchEntry::new(ticker, company_name));
    }

    Ok(entries)
}

/// TSV 파일을 읽어 관심종목 등록. 등록한 종목 수를 반환합니다.
///
/// 파싱이 모두 성공한 뒤에만 저장합니다.
pub async fn seed_watch_list(store: &dyn WatchStore, path: &Path) -> Result<usize> {
    let content = tokio::fs::read(path).await?;
    let entries = parse_watch_list(content.as_slice())?;

    tracing::info!(path = %path.display(), count = entries.len(), "관심종목 등록 시작");

    for entry in &entries {
        store.upsert_watch_entry(entry).await?;
    }

    Ok(entries.len())
}
