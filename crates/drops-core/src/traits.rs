//! Trait interfaces for the Drops pool.
//!
//! These traits define the seams between the pool and its collaborators:
//! - [`WeightingFunction`]: maps raw holdings to weighted shares (drops-pool implements)
//! - [`CashAsset`]: the external fungible asset backing the pool (drops-pool
//!   ships an in-memory implementation; a chain-backed adapter would be another)

use crate::error::CashError;
use crate::types::Address;

/// Pure mapping from a raw holding to a weighted claim amount.
///
/// Implementations must be deterministic and monotonic non-decreasing, and
/// must map zero to zero. The pool recomputes an account's weight on every
/// balance change and never caches results across different weightings.
pub trait WeightingFunction: Send + Sync {
    /// Weighted shares for a raw balance.
    fn weight(&self, raw_balance: u128) -> u128;

    /// Decimal precision of [`weight`](Self::weight)'s output, given the
    /// precision of its input.
    fn output_decimals(&self, input_decimals: u8) -> u8;
}

impl<W: WeightingFunction + ?Sized> WeightingFunction for Box<W> {
    fn weight(&self, raw_balance: u128) -> u128 {
        (**self).weight(raw_balance)
    }

    fn output_decimals(&self, input_decimals: u8) -> u8 {
        (**self).output_decimals(input_decimals)
    }
}

/// The external fungible cash asset.
///
/// Standard transfer / allowance semantics. Implementations must leave their
/// state untouched when returning an error.
pub trait CashAsset: Send {
    /// Decimal precision of cash amounts.
    fn decimals(&self) -> u8;

    /// Cash held by `owner`.
    fn balance_of(&self, owner: &Address) -> u128;

    /// Cash `spender` may still pull from `owner`.
    fn allowance(&self, owner: &Address, spender: &Address) -> u128;

    /// Move `amount` from `sender` to `recipient`.
    fn transfer(&mut self, sender: &Address, recipient: &Address, amount: u128) -> Result<(), CashError>;

    /// Pull `amount` from `owner` to `recipient` on behalf of `spender`,
    /// consuming allowance `owner` granted to `spender`.
    fn transfer_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        recipient: &Address,
        amount: u128,
    ) -> Result<(), CashError>;
}
