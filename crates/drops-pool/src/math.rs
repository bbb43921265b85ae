//! Full-precision integer helpers for claim arithmetic.
//!
//! Claims are `shares * cash / total_shares`. With 18-decimal amounts the
//! product routinely exceeds 128 bits, so it is formed as a [`U256`] and
//! divided back down.

use drops_core::error::LedgerError;
use primitive_types::U256;

/// Narrow a 256-bit quotient back to `u128`, or `None` if it does not fit.
fn narrow(value: U256) -> Option<u128> {
    if value > U256::from(u128::MAX) {
        None
    } else {
        Some(value.as_u128())
    }
}

/// `floor(a * b / divisor)` without intermediate overflow.
///
/// Returns `None` when `divisor` is zero or the quotient does not fit in
/// 128 bits.
pub fn mul_div(a: u128, b: u128, divisor: u128) -> Option<u128> {
    if divisor == 0 {
        return None;
    }
    // Both factors are below 2^128, so the product fits in 256 bits.
    narrow(U256::from(a) * U256::from(b) / U256::from(divisor))
}

/// `ceil(a * b / divisor)`; same failure cases as [`mul_div`].
pub fn mul_div_ceil(a: u128, b: u128, divisor: u128) -> Option<u128> {
    if divisor == 0 {
        return None;
    }
    let (quotient, remainder) = (U256::from(a) * U256::from(b)).div_mod(U256::from(divisor));
    let quotient = if remainder.is_zero() {
        quotient
    } else {
        quotient + U256::one()
    };
    narrow(quotient)
}

/// [`mul_div`] mapped onto the ledger's overflow error.
pub fn checked_mul_div(a: u128, b: u128, divisor: u128) -> Result<u128, LedgerError> {
    mul_div(a, b, divisor).ok_or(LedgerError::ArithmeticOverflow)
}

/// [`mul_div_ceil`] mapped onto the ledger's overflow error.
pub fn checked_mul_div_ceil(a: u128, b: u128, divisor: u128) -> Result<u128, LedgerError> {
    mul_div_ceil(a, b, divisor).ok_or(LedgerError::ArithmeticOverflow)
}

/// Widen an unsigned cash amount into the signed debt domain.
pub fn to_signed(value: u128) -> Result<i128, LedgerError> {
    i128::try_from(value).map_err(|_| LedgerError::ArithmeticOverflow)
}
