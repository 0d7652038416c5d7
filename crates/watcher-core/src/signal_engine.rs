//! 전일 종가 대비 등락률과 매매 신호 계산.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::domain::{PriceSignal, Signal};

/// 신호 임계값 (%). 경계값 자체는 Neutral.
pub const SIGNAL_THRESHOLD_PCT: Decimal = dec!(3.0);

/// 현재가와 전일 종가로 신호 계산.
///
/// 둘 중 하나라도 없거나 전일 종가가 0이면 빈 등락률과 `Neutral`을 반환합니다.
/// 신호 분류는 반올림 전 등락률로 판단하고, 표시 문자열만 소수 둘째 자리로 맞춥니다.
pub fn compute_signal(current: Option<Decimal>, previous_close: Option<Decimal>) -> PriceSignal {
    let (Some(current), Some(previous)) = (current, previous_close) else {
        return PriceSignal::unavailable();
    };
    if previous.is_zero() {
        return PriceSignal::unavailable();
    }

    let Some(movement) = (current - previous)
        .checked_div(previous)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
    else {
        return PriceSignal::unavailable();
    };

    PriceSignal {
        movement: format_movement(movement),
        signal: classify(movement),
    }
}

/// 등락률(%)을 신호로 분류.
pub fn classify(movement_pct: Decimal) -> Signal {
    if movement_pct > SIGNAL_THRESHOLD_PCT {
        Signal::Buy
    } else if movement_pct < -SIGNAL_THRESHOLD_PCT {
        Signal::Sell
    } else {
        Signal::Neutral
    }
}

fn format_movement(movement_pct: Decimal) -> String {
    let rounded = movement_pct.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // -0.001 같은 값이 "-0.00%"로 표시되지 않도록
    let rounded = if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    };
    format!("{:.2}%", rounded)
}
