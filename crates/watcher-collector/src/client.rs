//! 스크래핑 서비스 HTTP 클라이언트.
//!
//! `GET {base_url}/scrape?ticker={ticker}` 한 번으로 종목 지표를 가져옵니다.
//!
//! | 응답 | 처리 |
//! |------|------|
//! | 연결 실패, 타임아웃 | 재시도 |
//! | 2xx | JSON 디코딩 (실패 시 즉시 에러) |
//! | 502 / 503 / 504 | 재시도 (`Retry-After` 반영) |
//! | 그 외 | 즉시 에러 (본문 최대 2048바이트 포함) |

use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, warn};
use watcher_core::StockSnapshot;

use crate::config::{ScraperConfig, DEFAULT_SCRAPER_BASE_URL};
use crate::retry::{parse_retry_after, RetryConfig, RetryStats};

/// 에러 응답 본문 최대 보존 길이 (바이트)
pub const MAX_ERROR_BODY: usize = 2048;

/// 스크래핑 요청 에러
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("전송 실패 ({url}): {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("서버 오류 {status} ({url}): {body:?}")]
    Server {
        status: u16,
        url: String,
        body: String,
    },

    #[error("요청 거부 {status} ({url}): {body:?}")]
    Client {
        status: u16,
        url: String,
        body: String,
    },

    #[error("응답 디코딩 실패 ({url}): {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("요청 생성 실패 ({url}): {source}")]
    InvalidRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("요청 실패: {url}")]
    RequestFailed { url: String },
}

impl FetchError {
    /// 재시도 대상 여부 (전송 실패, 502/503/504)
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Server { .. })
    }

    /// HTTP 상태 코드 (응답을 받은 경우)
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } | Self::Client { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// 시도 1회의 실패와 서버가 요청한 대기 시간
struct AttemptFailure {
    error: FetchError,
    retry_after: Option<Duration>,
}

impl From<FetchError> for AttemptFailure {
    fn from(error: FetchError) -> Self {
        Self {
            error,
            retry_after: None,
        }
    }
}

/// 재시도를 포함한 스크래핑 서비스 클라이언트.
///
/// 지터용 난수 생성기는 생성 시 주입되며 클라이언트 수명 동안만 사용됩니다.
pub struct ScraperClient {
    base_url: String,
    http: reqwest::Client,
    retry: RetryConfig,
    rng: Mutex<StdRng>,
}

impl ScraperClient {
    /// 엔트로피 시드 난수 생성기로 클라이언트 생성
    pub fn new(config: &ScraperConfig) -> Result<Self, FetchError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// 주어진 난수 생성기로 클라이언트 생성 (테스트에서 시드 고정용)
    pub fn with_rng(config: &ScraperConfig, rng: StdRng) -> Result<Self, FetchError> {
        let base_url = normalize_base_url(&config.base_url);
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| FetchError::InvalidRequest {
                url: base_url.clone(),
                source,
            })?;

        Ok(Self {
            base_url,
            http,
            retry: config.retry.clone(),
            rng: Mutex::new(rng),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// 종목 지표 조회
    pub async fn fetch(&self, ticker: &str) -> Result<StockSnapshot, FetchError> {
        self.fetch_with_stats(ticker)
            .await
            .map(|(snapshot, _)| snapshot)
    }

    /// 종목 지표 조회 (재시도 통계 포함).
    ///
    /// 최대 `max_retries + 1`회 요청합니다. 재시도를 모두 소진하면 마지막 에러를 반환합니다.
    pub async fn fetch_with_stats(
        &self,
        ticker: &str,
    ) -> Result<(StockSnapshot, RetryStats), FetchError> {
        let url = self.scrape_url(ticker);
        let mut total_delay = Duration::ZERO;
        let mut last_error: Option<FetchError> = None;

        for attempt in 0..=self.retry.max_retries {
            match self.attempt(&url, ticker).await {
                Ok(snapshot) => {
                    if attempt > 0 {
                        debug!(
                            ticker = %ticker,
                            attempts = attempt + 1,
                            total_delay_ms = total_delay.as_millis() as u64,
                            "재시도 후 성공"
                        );
                    }
                    let stats = RetryStats {
                        total_attempts: attempt + 1,
                        total_delay,
                    };
                    return Ok((snapshot, stats));
                }
                Err(failure) => {
                    if !failure.error.is_retryable() {
                        return Err(failure.error);
                    }

                    if attempt >= self.retry.max_retries {
                        warn!(
                            ticker = %ticker,
                            error = %failure.error,
                            attempts = attempt + 1,
                            "최대 재시도 횟수 초과"
                        );
                        last_error = Some(failure.error);
                        break;
                    }

                    let delay = self.next_delay(attempt, failure.retry_after);
                    warn!(
                        ticker = %ticker,
                        error = %failure.error,
                        attempt = attempt + 1,
                        max_retries = self.retry.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "재시도 대기 중"
                    );
                    last_error = Some(failure.error);

                    tokio::time::sleep(delay).await;
                    total_delay += delay;
                }
            }
        }

        Err(last_error.unwrap_or(FetchError::RequestFailed { url }))
    }

    async fn attempt(&self, url: &str, ticker: &str) -> Result<StockSnapshot, AttemptFailure> {
        let request = self
            .http
            .get(format!("{}/scrape", self.base_url))
            .query(&[("ticker", ticker)])
            .build()
            .map_err(|source| FetchError::InvalidRequest {
                url: url.to_string(),
                source,
            })?;

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            let bytes = response
                .bytes()
                .await
                .map_err(|source| FetchError::Transport {
                    url: url.to_string(),
                    source,
                })?;
            let snapshot = serde_json::from_slice::<StockSnapshot>(&bytes).map_err(|source| {
                FetchError::Decode {
                    url: url.to_string(),
                    source,
                }
            })?;
            return Ok(snapshot);
        }

        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| parse_retry_after(v, Utc::now()));
        let body = read_error_body(response).await;

        let error = if is_retryable_status(status) {
            FetchError::Server {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            }
        } else {
            FetchError::Client {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            }
        };

        Err(AttemptFailure { error, retry_after })
    }

    fn next_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.retry.delay_for(attempt, retry_after, &mut *rng)
    }

    fn scrape_url(&self, ticker: &str) -> String {
        format!("{}/scrape?ticker={}", self.base_url, ticker)
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
    )
}

/// 공백 제거, 끝의 `/` 제거. 비어 있으면 기본 주소.
fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_SCRAPER_BASE_URL.to_string()
    } else {
        trimmed.to_string()
    }
}

/// 에러 응답 본문을 최대 [`MAX_ERROR_BODY`]바이트까지만 읽음.
///
/// 본문을 읽지 못해도 상태 코드로 분류는 가능하므로 읽기 에러는 무시합니다.
async fn read_error_body(mut response: reqwest::Response) -> String {
    let mut buf: Vec<u8> = Vec::with_capacity(MAX_ERROR_BODY);
    while buf.len() < MAX_ERROR_BODY {
        match response.chunk().await {
            Ok(Some(chunk)) => buf.extend_from_slice(&chunk),
            Ok(None) | Err(_) => break,
        }
    }
    buf.truncate(MAX_ERROR_BODY);

    // 잘린 멀티바이트 문자는 truncate_body에서 제거됨
    let body = String::from_utf8_lossy(&buf);
    truncate_body(body.trim())
}

/// UTF-8 경계를 지키며 최대 길이로 자름
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("http://scraper:8085/"), "http://scraper:8085");
        assert_eq!(normalize_base_url("  http://scraper:8085//  "), "http://scraper:8085");
        assert_eq!(normalize_base_url("   "), DEFAULT_SCRAPER_BASE_URL);
    }

    #[test]
    fn test_truncate_body_respects_char_boundary() {
        let ascii = "a".repeat(5000);
        assert_eq!(truncate_body(&ascii).len(), MAX_ERROR_BODY);

        // 3바이트 문자: 2048은 문자 경계가 아님
        let japanese = "円".repeat(1000);
        let truncated = truncate_body(&japanese);
        assert!(truncated.len() <= MAX_ERROR_BODY);
        assert_eq!(truncated.len() % 3, 0);

        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(StatusCode::BAD_GATEWAY));
        assert!(is_retryable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_retryable_status(StatusCode::GATEWAY_TIMEOUT));
        assert!(!is_retryable_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!is_retryable_status(StatusCode::NOT_FOUND));
        assert!(!is_retryable_status(StatusCode::TOO_MANY_REQUESTS));
    }

    #[test]
    fn test_error_classification() {
        let server = FetchError::Server {
            status: 503,
            url: "u".into(),
            body: String::new(),
        };
        let client = FetchError::Client {
            status: 404,
            url: "u".into(),
            body: String::new(),
        };
        assert!(server.is_retryable());
        assert!(!client.is_retryable());
        assert_eq!(client.status(), Some(404));
        assert!(!FetchError::RequestFailed { url: "u".into() }.is_retryable());
    }
}
