use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Prints `value` with exactly `precision` fraction digits, rounding half away
/// from zero.
///
/// Values `Decimal` cannot hold (non-finite or out of range) fall back to the
/// standard float formatter.
#[must_use]
pub fn format_precision(value: f64, precision: u32) -> String {
    let precision = precision.min(16);
    match Decimal::from_f64(value) {
        Some(decimal) => {
            let mut decimal =
                decimal.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
            decimal.rescale(precision);
            decimal.to_string()
        }
        None => format!("{value:.prec$}", prec = precision as usize),
    }
}

/// Inserts `separator` between groups of three integer digits.
///
/// Text that is not a plain decimal number is returned unchanged.
#[must_use]
pub fn format_thousands(value: &str, separator: &str) -> String {
    if separator.is_empty() || value.parse::<f64>().is_err() {
        return value.to_owned();
    }
    let (sign, unsigned) = match value.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", value),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };
    if !integer.bytes().all(|byte| byte.is_ascii_digit()) {
        return value.to_owned();
    }

    let mut grouped = String::with_capacity(value.len() + integer.len() / 3 * separator.len());
    grouped.push_str(sign);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

/// Folds a run of at least `threshold` zeros right after the decimal point:
/// `0.000001234` becomes `0.0{5}1234`.
#[must_use]
pub fn format_decimal_fold(value: &str, threshold: usize) -> String {
    let Some((integer, fraction)) = value.split_once('.') else {
        return value.to_owned();
    };
    let zeros = fraction.bytes().take_while(|byte| *byte == b'0').count();
    let rest = &fraction[zeros..];
    if threshold == 0
        || zeros < threshold
        || rest.is_empty()
        || !rest.bytes().all(|byte| byte.is_ascii_digit())
    {
        return value.to_owned();
    }
    format!("{integer}.0{{{zeros}}}{rest}")
}

/// Abbreviates large numbers with `K`, `M` or `B` and three decimals.
#[must_use]
pub fn format_big_number(value: &str) -> String {
    let Ok(number) = value.parse::<f64>() else {
        return value.to_owned();
    };
    let magnitude = number.abs();
    let (divisor, unit) = if magnitude > 1_000_000_000.0 {
        (1_000_000_000.0, "B")
    } else if magnitude > 1_000_000.0 {
        (1_000_000.0, "M")
    } else if magnitude > 1_000.0 {
        (1_000.0, "K")
    } else {
        return value.to_owned();
    };
    format!("{}{unit}", format_precision(number / divisor, 3))
}
