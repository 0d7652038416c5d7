//! 일간 등락률 기반 매매 신호.
//!
//! - `Signal` - 세 가지 상태의 신호 (Buy / Sell / Neutral)
//! - `PriceSignal` - 표시용 등락률 문자열과 신호의 묶음

use serde::{Deserialize, Serialize};

/// 등락률로 분류한 매매 신호.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Signal {
    /// 상승 모멘텀 (+3% 초과)
    Buy,
    /// 하락 모멘텀 (-3% 미만)
    Sell,
    /// 그 외, 또는 가격 정보 부족
    #[default]
    Neutral,
}

impl Signal {
    /// 저장 컬럼에 기록되는 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Buy => "Buy",
            Signal::Sell => "Sell",
            Signal::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Signal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Buy" => Ok(Signal::Buy),
            "Sell" => Ok(Signal::Sell),
            "Neutral" => Ok(Signal::Neutral),
            other => Err(format!("알 수 없는 신호: {}", other)),
        }
    }
}

/// 등락률 + 신호.
///
/// `movement`가 빈 문자열이면 계산 불가(현재가/전일 종가 없음, 전일 종가 0)를
/// 의미하며 이때 신호는 항상 `Neutral`입니다.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceSignal {
    /// 등락률 표시 문자열 (예: "3.00%", "-4.12%")
    pub movement: String,
    /// 매매 신호
    pub signal: Signal,
}

impl PriceSignal {
    /// 계산 불가 상태 (빈 등락률, Neutral).
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// 등락률이 계산되었는지 여부.
    pub fn has_movement(&self) -> bool {
        !self.movement.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_display_roundtrips_column_value() {
        for signal in [Signal::Buy, Signal::Sell, Signal::Neutral] {
            assert_eq!(signal.to_string().parse::<Signal>().unwrap(), signal);
        }
        assert!("BUY".parse::<Signal>().is_err());
    }

    #[test]
    fn test_unavailable_is_neutral_without_movement() {
        let ps = PriceSignal::unavailable();
        assert_eq!(ps.signal, Signal::Neutral);
        assert!(!ps.has_movement());
    }
}
