//! Pool constants. All amounts are integers in base units of their asset.

/// Decimal precision used by the reference deployment for both the cash
/// asset and the native unit.
pub const DEFAULT_DECIMALS: u8 = 18;

/// Largest supported decimal precision.
///
/// `10^38` is the largest power of ten that fits in a `u128`.
pub const MAX_DECIMALS: u8 = 38;

/// Default token name for a freshly configured pool.
pub const DEFAULT_NAME: &str = "Drops";

/// Default token symbol for a freshly configured pool.
pub const DEFAULT_SYMBOL: &str = "DROP";

/// Allowance value treated as unlimited by cash assets.
///
/// Mirrors the `MaxUint256` approval idiom: an unlimited allowance is never
/// decremented by `transfer_from`.
pub const UNLIMITED_ALLOWANCE: u128 = u128::MAX;

/// `10^decimals` as a `u128`, or `None` above [`MAX_DECIMALS`].
///
/// # Examples
///
/// ```
/// use drops_core::constants::pow10;
/// assert_eq!(pow10(0), Some(1));
/// assert_eq!(pow10(18), Some(1_000_000_000_000_000_000));
/// assert_eq!(pow10(39), None);
/// ```
pub const fn pow10(decimals: u8) -> Option<u128> {
    if decimals > MAX_DECIMALS {
        return None;
    }
    let mut value: u128 = 1;
    let mut i = 0;
    while i < decimals {
        value *= 10;
        i += 1;
    }
    Some(value)
}
