//! 일본어 로케일 숫자 문자열 정규화.
//!
//! 스크래핑 서비스는 사람이 읽는 형식의 값을 돌려줍니다:
//!
//! | 입력 | 결과 |
//! |------|------|
//! | `"12,345"` | 12345 |
//! | `"1.5億円"` | 150000000 |
//! | `"13.5倍"` | 13.5 |
//! | `"12.3%"` | 12.3 |
//! | `"－"`, `""` | 없음 |
//!
//! 형식이 맞지 않는 값은 추측하지 않고 `None`을 반환합니다. `None`과 0은 구분됩니다.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

/// 배수 단위. 앞에서부터 검사하며 처음 발견된 하나만 적용합니다.
const MAGNITUDE_MARKERS: [(&str, i64); 3] = [
    ("兆", 1_000_000_000_000),
    ("億", 100_000_000),
    ("万", 10_000),
];

/// 제거할 단위 표기 (통화, 퍼센트, 배, 주).
const UNIT_MARKERS: [&str; 6] = ["円", "%", "％", "倍", "x", "株"];

/// 부호 포함 일반 소수 (ASCII 숫자만, 지수 표기 불가)
static PLAIN_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)$").expect("valid regex"));

/// 주석이 붙은 필드에서 첫 번째 ASCII 숫자 (쉼표 자릿수 구분 허용).
///
/// 전각 숫자(`１２`)는 숫자로 보지 않음
static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9][0-9,]*(?:\.[0-9]+)?").expect("valid regex"));

/// 로케일 문자열을 숫자로 변환.
///
/// 1. 공백뿐이면 `None`
/// 2. 兆/億/万 중 처음 발견된 단위로 배수 결정 (여러 단위는 합성하지 않음)
/// 3. 円, %, 倍, 株 등 단위와 쉼표 제거
/// 4. 남은 문자열이 소수가 아니면 `None`
pub fn normalize(raw: &str) -> Option<Decimal> {
    let mut clean = raw.trim().to_string();
    if clean.is_empty() {
        return None;
    }

    let mut multiplier = Decimal::ONE;
    if let Some((marker, factor)) = MAGNITUDE_MARKERS
        .iter()
        .find(|(marker, _)| clean.contains(marker))
    {
        multiplier = Decimal::from(*factor);
        clean = clean.replace(marker, "");
    }

    for unit in UNIT_MARKERS {
        clean = clean.replace(unit, "");
    }
    let clean = clean.replace(',', "");

    parse_plain_decimal(clean.trim())?.checked_mul(multiplier)
}

/// 전일 종가 필드 정규화.
///
/// `"2,496.5 (12/29)"`처럼 날짜 등 주석이 붙어 있으므로 첫 번째 숫자 부분만
/// 추출한 뒤 [`normalize`]와 같은 규칙을 적용합니다.
pub fn normalize_previous_close(raw: &str) -> Option<Decimal> {
    let number = FIRST_NUMBER.find(raw)?;
    normalize(number.as_str())
}

fn parse_plain_decimal(s: &str) -> Option<Decimal> {
    if !PLAIN_DECIMAL.is_match(s) {
        return None;
    }

    let (negative, body) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    // "1." / ".5" 형태를 Decimal 파서가 받는 형태로 맞춤
    let body = body.strip_suffix('.').unwrap_or(body);
    let body = if body.starts_with('.') {
        format!("0{}", body)
    } else {
        body.to_string()
    };

    let value = Decimal::from_str(&body).ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_blank_input_is_absent() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("   "), None);
        assert_eq!(normalize("\t\n"), None);
    }

    #[test]
    fn test_dash_placeholder_is_absent() {
        assert_eq!(normalize("－"), None);
        assert_eq!(normalize("-"), None);
        assert_eq!(normalize("---"), None);
    }

    #[test]
    fn test_thousands_separator() {
        assert_eq!(normalize("1,234"), Some(dec!(1234)));
        assert_eq!(normalize("24,209,200"), Some(dec!(24209200)));
    }

    #[test]
    fn test_magnitude_markers() {
        assert_eq!(normalize("1.5億円"), Some(dec!(150000000)));
        assert_eq!(normalize("2兆"), Some(dec!(2000000000000)));
        assert_eq!(normalize("3.2万株"), Some(dec!(32000)));
    }

    #[test]
    fn test_unit_markers() {
        assert_eq!(normalize("12.3%"), Some(dec!(12.3)));
        assert_eq!(normalize("2.97％"), Some(dec!(2.97)));
        assert_eq!(normalize("13.5倍"), Some(dec!(13.5)));
        assert_eq!(normalize("2,493.0円"), Some(dec!(2493.0)));
        assert_eq!(normalize("1.36x"), Some(dec!(1.36)));
    }

    #[test]
    fn test_zero_is_a_real_value() {
        assert_eq!(normalize("0"), Some(Decimal::ZERO));
        assert_eq!(normalize("0.00円"), Some(Decimal::ZERO));
    }

    #[test]
    fn test_signed_values() {
        assert_eq!(normalize("-1.25%"), Some(dec!(-1.25)));
        assert_eq!(normalize("+40円"), Some(dec!(40)));
    }

    #[test]
    fn test_loose_decimal_forms() {
        assert_eq!(normalize("5."), Some(dec!(5)));
        assert_eq!(normalize(".5"), Some(dec!(0.5)));
        assert_eq!(normalize("-.5"), Some(dec!(-0.5)));
    }

    #[test]
    fn test_multiple_magnitudes_are_not_composed() {
        // 兆만 제거되고 億이 남아 파싱 실패
        assert_eq!(normalize("29兆5,862億円"), None);
    }

    #[test]
    fn test_garbage_fails_closed() {
        assert_eq!(normalize("abc"), None);
        assert_eq!(normalize("1.2.3"), None);
        assert_eq!(normalize("1_000"), None);
        assert_eq!(normalize("1e5"), None);
        assert_eq!(normalize("億円"), None);
    }

    #[test]
    fn test_previous_close_with_annotation() {
        assert_eq!(
            normalize_previous_close("2,496.5 (12/29)"),
            Some(dec!(2496.5))
        );
        assert_eq!(normalize_previous_close("1,020円 (01/05)"), Some(dec!(1020)));
        assert_eq!(normalize_previous_close("前日 850"), Some(dec!(850)));
    }

    #[test]
    fn test_previous_close_skips_fullwidth_digits() {
        assert_eq!(
            normalize_previous_close("（１２／２９）2,496.5"),
            Some(dec!(2496.5))
        );
        assert_eq!(normalize_previous_close("１２３"), None);
        assert_eq!(normalize("１２３"), None);
    }

    #[test]
    fn test_previous_close_without_number() {
        assert_eq!(normalize_previous_close(""), None);
        assert_eq!(normalize_previous_close("－"), None);
        assert_eq!(normalize_previous_close("(--/--)"), None);
    }
}
