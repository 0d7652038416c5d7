//! 스크래핑 요청 재시도 정책.
//!
//! 재시도 `n`회차(0부터) 대기 시간:
//!
//! ```text
//! delay = min(base_delay * 2^n, max_delay)
//! delay = min(max(delay, Retry-After), max_delay)
//! delay += jitter ∈ [0, jitter_max]
//! ```
//!
//! 지터는 호출자가 넘겨준 난수 생성기로 뽑으므로 시드를 고정하면 재현 가능합니다.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;

/// 재시도 설정.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// 최대 재시도 횟수 (초기 시도 제외).
    pub max_retries: u32,
    /// 기본 대기 시간.
    pub base_delay: Duration,
    /// 최대 대기 시간 (Retry-After도 이 값으로 제한).
    pub max_delay: Duration,
    /// 지터 상한. 0이면 지터 없음.
    pub jitter_max: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 6,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(4),
            jitter_max: Duration::from_millis(250),
        }
    }
}

impl RetryConfig {
    /// 재시도 없음 (단일 시도).
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// 지터를 제외한 대기 시간.
    pub fn backoff_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let exponential = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_delay);

        match retry_after {
            Some(requested) if requested > exponential => requested.min(self.max_delay),
            _ => exponential,
        }
    }

    /// 지터를 포함한 대기 시간.
    pub fn delay_for<R: Rng + ?Sized>(
        &self,
        attempt: u32,
        retry_after: Option<Duration>,
        rng: &mut R,
    ) -> Duration {
        self.backoff_delay(attempt, retry_after) + self.jitter(rng)
    }

    fn jitter<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let max_ms = self.jitter_max.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rng.gen_range(0..=max_ms))
    }
}

/// 재시도 결과 통계.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryStats {
    /// 총 시도 횟수.
    pub total_attempts: u32,
    /// 총 대기 시간.
    pub total_delay: Duration,
}

/// `Retry-After` 헤더 값 해석.
///
/// 초 단위 정수 또는 HTTP-date를 받습니다. 이미 지난 시각, 0, 해석 불가한 값은 `None`.
pub fn parse_retry_after(value: &str, now: DateTime<Utc>) -> Option<Duration> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(seconds) = trimmed.parse::<u64>() {
        return (seconds > 0).then(|| Duration::from_secs(seconds));
    }

    let retry_at = DateTime::parse_from_rfc2822(trimmed).ok()?;
    (retry_at.with_timezone(&Utc) - now)
        .to_std()
        .ok()
        .filter(|wait| !wait.is_zero())
}
