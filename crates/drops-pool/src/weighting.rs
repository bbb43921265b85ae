//! Weighting functions mapping raw holdings to weighted shares.
//!
//! [`SqrtWeighting`] is the production weighting: an integer square root,
//! which halves the decimal precision (a balance at `D` decimals yields
//! shares at `D / 2` decimals). [`LinearWeighting`] is the identity and
//! exists to regression-test the engine against a linear model.

use drops_core::traits::WeightingFunction;

/// Integer square root weighting, truncated toward zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqrtWeighting;

impl SqrtWeighting {
    /// Create a new SqrtWeighting.
    pub fn new() -> Self {
        Self
    }
}

impl WeightingFunction for SqrtWeighting {
    fn weight(&self, raw_balance: u128) -> u128 {
        raw_balance.isqrt()
    }

    fn output_decimals(&self, input_decimals: u8) -> u8 {
        input_decimals / 2
    }
}

/// Identity weighting: one raw unit, one share.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearWeighting;

impl WeightingFunction for LinearWeighting {
    fn weight(&self, raw_balance: u128) -> u128 {
        raw_balance
    }

    fn output_decimals(&self, input_decimals: u8) -> u8 {
        input_decimals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ONE: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn sqrt_of_zero_and_one() {
        let w = SqrtWeighting::new();
        assert_eq!(w.weight(0), 0);
        assert_eq!(w.weight(1), 1);
    }

    #[test]
    fn sqrt_of_one_token_is_one_share() {
        // 1.0 at 18 decimals -> 1.0 at 9 decimals.
        assert_eq!(SqrtWeighting.weight(ONE), 1_000_000_000);
        assert_eq!(SqrtWeighting.output_decimals(18), 9);
    }

    #[test]
    fn sqrt_of_hundred_tokens() {
        assert_eq!(SqrtWeighting.weight(100 * ONE), 10_000_000_000);
    }

    #[test]
    fn sqrt_truncates() {
        assert_eq!(SqrtWeighting.weight(15), 3);
        assert_eq!(SqrtWeighting.weight(16), 4);
        assert_eq!(SqrtWeighting.weight(17), 4);
    }

    #[test]
    fn sqrt_of_max() {
        assert_eq!(SqrtWeighting.weight(u128::MAX), u64::MAX as u128);
    }

    #[test]
    fn doubling_holding_less_than_doubles_weight() {
        let w = SqrtWeighting;
        let single = w.weight(50 * ONE);
        let double = w.weight(100 * ONE);
        assert!(double < single * 2, "{double} should be < 2 * {single}");
    }

    #[test]
    fn linear_is_identity() {
        assert_eq!(LinearWeighting.weight(123_456), 123_456);
        assert_eq!(LinearWeighting.output_decimals(18), 18);
    }

    // --- proptest ---

    proptest! {
        #[test]
        fn sqrt_brackets_input(x in any::<u128>()) {
            let r = SqrtWeighting.weight(x);
            prop_assert!(r * r <= x);
            // (r + 1)^2 > x, checked without overflow.
            let next = r + 1;
            prop_assert!(next.checked_mul(next).is_none_or(|sq| sq > x));
        }

        #[test]
        fn sqrt_exact_on_perfect_squares(r in 0u128..=u64::MAX as u128) {
            prop_assert_eq!(SqrtWeighting.weight(r * r), r);
        }

        #[test]
        fn sqrt_monotonic(a in any::<u128>(), b in any::<u128>()) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(SqrtWeighting.weight(lo) <= SqrtWeighting.weight(hi));
        }
    }
}
