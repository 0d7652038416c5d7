//! 에러 타입 정의.

use std::fmt;

use crate::client::FetchError;
use crate::storage::StorageError;

/// Collector 에러 타입
#[derive(Debug)]
pub enum CollectorError {
    /// 데이터베이스 에러
    Database(sqlx::Error),
    /// 설정 에러
    Config(String),
    /// 데이터 소스 에러 (스크래핑 서비스)
    DataSource(FetchError),
    /// 저장소 에러
    Storage(StorageError),
    /// 관심종목 TSV 입력 에러
    Input { line: usize, reason: String },
    /// 파일 입출력 에러
    Io(std::io::Error),
}

impl fmt::Display for CollectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database(e) => write!(f, "Database error: {}", e),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::DataSource(e) => write!(f, "Data source error: {}", e),
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Input { line, reason } => {
                write!(f, "Invalid watch list input at line {}: {}", line, reason)
            }
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CollectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database(e) => Some(e),
            Self::DataSource(e) => Some(e),
            Self::Storage(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Config(_) | Self::Input { .. } => None,
        }
    }
}

impl From<sqlx::Error> for CollectorError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err)
    }
}

impl From<FetchError> for CollectorError {
    fn from(err: FetchError) -> Self {
        Self::DataSource(err)
    }
}

impl From<StorageError> for CollectorError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl From<std::io::Error> for CollectorError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
