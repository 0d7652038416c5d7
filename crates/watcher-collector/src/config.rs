//! 환경변수 기반 설정 모듈.
//!
//! `.env`, `env.config` 파일을 차례로 읽어 환경변수를 채운 뒤 값을 해석합니다.
//! 이미 설정된 프로세스 환경변수가 파일 값보다 우선합니다.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::CollectorError;
use crate::retry::RetryConfig;
use crate::Result;

/// 기본 스크래핑 서비스 주소
pub const DEFAULT_SCRAPER_BASE_URL: &str = "http://host.docker.internal:8085";

/// Watcher 전체 설정
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// 데이터베이스 URL
    pub database_url: String,
    /// 스크래핑 서비스 설정
    pub scraper: ScraperConfig,
    /// 배치 설정
    pub batch: BatchConfig,
    /// 관심종목 TSV 경로
    pub watchlist_path: PathBuf,
}

/// 스크래핑 서비스 클라이언트 설정
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// 기본 URL (`/scrape` 앞부분)
    pub base_url: String,
    /// 요청 단위 타임아웃
    pub timeout: Duration,
    /// 재시도 정책
    pub retry: RetryConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SCRAPER_BASE_URL.to_string(),
            timeout: Duration::from_secs(15),
            retry: RetryConfig::default(),
        }
    }
}

/// 배치 실행 설정
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// 종목 간 대기 시간 (0이면 대기 없음)
    pub request_interval: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            request_interval: Duration::from_secs(3),
        }
    }
}

impl WatcherConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        dotenvy::from_filename("env.config").ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 키 조회 함수로 설정 구성.
    ///
    /// 해석할 수 없는 값은 기본값으로 대체합니다.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                CollectorError::Config("DATABASE_URL 환경변수가 설정되지 않았습니다".to_string())
            })?;

        let scraper_defaults = ScraperConfig::default();
        let retry_defaults = scraper_defaults.retry.clone();

        Ok(Self {
            database_url,
            scraper: ScraperConfig {
                base_url: lookup("SCRAPER_BASE_URL")
                    .filter(|v| !v.trim().is_empty())
                    .unwrap_or(scraper_defaults.base_url),
                timeout: Duration::from_secs(parse_or(
                    &lookup,
                    "SCRAPER_TIMEOUT_SECS",
                    scraper_defaults.timeout.as_secs(),
                )),
                retry: RetryConfig {
                    max_retries: parse_or(&lookup, "SCRAPER_MAX_RETRIES", retry_defaults.max_retries),
                    base_delay: millis_or(&lookup, "SCRAPER_RETRY_BASE_MS", retry_defaults.base_delay),
                    max_delay: millis_or(&lookup, "SCRAPER_RETRY_MAX_MS", retry_defaults.max_delay),
                    jitter_max: millis_or(
                        &lookup,
                        "SCRAPER_RETRY_JITTER_MS",
                        retry_defaults.jitter_max,
                    ),
                },
            },
            batch: BatchConfig {
                request_interval: lookup("SCRAPER_REQUEST_INTERVAL")
                    .and_then(|v| parse_duration(&v))
                    .unwrap_or(BatchConfig::default().request_interval),
            },
            watchlist_path: lookup("WATCHLIST_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("src/tickers1.tsv")),
        })
    }
}

/// 값을 파싱 (실패 시 기본값 사용)
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// 밀리초 값을 Duration으로 파싱
fn millis_or<F>(lookup: &F, key: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}

/// `"500ms"`, `"3s"`, `"2m"`, `"1h"`, `"1.5s"`, `"4"`(초) 형식의 기간 파싱.
pub fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    let (number, scale) = if let Some(n) = value.strip_suffix("ms") {
        (n, Scale::Div(1000.0))
    } else if let Some(n) = value.strip_suffix('s') {
        (n, Scale::Mul(1.0))
    } else if let Some(n) = value.strip_suffix('m') {
        (n, Scale::Mul(60.0))
    } else if let Some(n) = value.strip_suffix('h') {
        (n, Scale::Mul(3600.0))
    } else {
        (value, Scale::Mul(1.0))
    };

    let number: f64 = number.trim().parse().ok()?;
    let secs = match scale {
        Scale::Mul(factor) => number * factor,
        Scale::Div(divisor) => number / divisor,
    };
    Duration::try_from_secs_f64(secs).ok()
}

enum Scale {
    Mul(f64),
    Div(f64),
}
