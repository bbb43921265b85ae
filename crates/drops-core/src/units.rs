//! Decimal display and parsing of base-unit amounts.
//!
//! Formatting follows the convention of common wallet tooling: the integer
//! part, a dot, and the fractional part with trailing zeros trimmed but at
//! least one digit kept, so `10^18` at 18 decimals renders as `"1.0"`.

use crate::constants::pow10;
use crate::error::UnitsError;

/// Render `value` base units at `decimals` precision.
///
/// # Examples
///
/// ```
/// use drops_core::units::format_units;
/// assert_eq!(format_units(100_000_000_000_000_000_000, 18), "100.0");
/// assert_eq!(format_units(1_500_000, 6), "1.5");
/// assert_eq!(format_units(0, 18), "0.0");
/// ```
pub fn format_units(value: u128, decimals: u8) -> String {
    let Some(scale) = pow10(decimals) else {
        return value.to_string();
    };
    let whole = value / scale;
    let frac = value % scale;
    if decimals == 0 {
        return format!("{whole}.0");
    }
    let digits = format!("{frac:0width$}", width = decimals as usize);
    let trimmed = digits.trim_end_matches('0');
    if trimmed.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{trimmed}")
    }
}

/// Render a signed amount, e.g. an account's debt basis.
pub fn format_signed_units(value: i128, decimals: u8) -> String {
    let body = format_units(value.unsigned_abs(), decimals);
    if value < 0 { format!("-{body}") } else { body }
}

/// Parse a decimal string into base units at `decimals` precision.
///
/// Accepts `"100"`, `"100.0"`, `"0.5"` and `".5"`. Rejects more fractional
/// digits than the precision allows rather than silently truncating.
pub fn parse_units(input: &str, decimals: u8) -> Result<u128, UnitsError> {
    let scale = pow10(decimals).ok_or(UnitsError::UnsupportedPrecision(decimals))?;
    let input = input.trim();
    if input.is_empty() {
        return Err(UnitsError::Empty);
    }

    let (whole_str, frac_str) = match input.split_once('.') {
        Some((w, f)) => (w, f),
        None => (input, ""),
    };
    if whole_str.is_empty() && frac_str.is_empty() {
        return Err(UnitsError::Empty);
    }
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole_str) || !all_digits(frac_str) {
        return Err(UnitsError::InvalidDigit(input.to_string()));
    }

    let frac_trimmed = frac_str.trim_end_matches('0');
    if frac_trimmed.len() > decimals as usize {
        return Err(UnitsError::TooPrecise { got: frac_trimmed.len(), max: decimals });
    }

    let whole: u128 = if whole_str.is_empty() {
        0
    } else {
        whole_str.parse().map_err(|_| UnitsError::Overflow)?
    };
    let mut frac: u128 = 0;
    if !frac_trimmed.is_empty() {
        frac = frac_trimmed.parse().map_err(|_| UnitsError::Overflow)?;
        let pad = decimals as usize - frac_trimmed.len();
        // pad <= decimals <= MAX_DECIMALS, so this cannot fail.
        frac *= pow10(pad as u8).ok_or(UnitsError::Overflow)?;
    }

    whole
        .checked_mul(scale)
        .and_then(|w| w.checked_add(frac))
        .ok_or(UnitsError::Overflow)
}

/// Convert an amount between two precisions.
///
/// Scaling up multiplies (returning `None` on overflow); scaling down
/// truncates toward zero.
pub fn rescale(amount: u128, from_decimals: u8, to_decimals: u8) -> Option<u128> {
    if from_decimals == to_decimals {
        return Some(amount);
    }
    if to_decimals > from_decimals {
        amount.checked_mul(pow10(to_decimals - from_decimals)?)
    } else {
        Some(amount / pow10(from_decimals - to_decimals)?)
    }
}
