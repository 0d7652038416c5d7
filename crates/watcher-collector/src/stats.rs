//! 배치 통계 구조체.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use watcher_core::Signal;

/// 배치 실행 통계
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchStats {
    /// 관심종목 수
    pub total: usize,
    /// 저장까지 완료된 종목 수
    pub success: usize,
    /// 조회 실패 (재시도 소진 포함)
    pub fetch_failed: usize,
    /// 저장 실패
    pub write_failed: usize,
    /// Buy 신호 수
    pub buy: usize,
    /// Sell 신호 수
    pub sell: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl BatchStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장 완료된 종목의 신호 집계
    pub fn record_signal(&mut self, signal: Signal) {
        match signal {
            Signal::Buy => self.buy += 1,
            Signal::Sell => self.sell += 1,
            Signal::Neutral => {}
        }
    }

    /// 실패 합계
    pub fn failed(&self) -> usize {
        self.fetch_failed + self.write_failed
    }

    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            total = self.total,
            success = self.success,
            fetch_failed = self.fetch_failed,
            write_failed = self.write_failed,
            buy = self.buy,
            sell = self.sell,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "배치 완료"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate() {
        let stats = BatchStats {
            total: 4,
            success: 3,
            fetch_failed: 1,
            ..Default::default()
        };
        assert!((stats.success_rate() - 75.0).abs() < f64::EPSILON);
        assert_eq!(stats.failed(), 1);
        assert_eq!(BatchStats::new().success_rate(), 0.0);
    }

    #[test]
    fn test_record_signal() {
        let mut stats = BatchStats::new();
        stats.record_signal(Signal::Buy);
        stats.record_signal(Signal::Neutral);
        stats.record_signal(Signal::Sell);
        stats.record_signal(Signal::Buy);
        assert_eq!((stats.buy, stats.sell), (2, 1));
    }
}
